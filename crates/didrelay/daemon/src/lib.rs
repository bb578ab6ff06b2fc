//! didrelay router daemon
//!
//! This crate wires the router together:
//! - configuration layering and CLI overrides
//! - startup of the protocol dispatcher over the framework services
//! - the HTTP surface for invitation creation and connection status

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, DaemonResult};
pub use server::Server;

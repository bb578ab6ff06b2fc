//! HTTP surface of the router

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

//! API request handlers

mod connections;
mod health;
mod invitation;

pub use connections::*;
pub use health::*;
pub use invitation::*;

//! Framework boundary primitives.
//!
//! The DIDComm framework owns the duplex transport and every sub-protocol
//! state machine. Each sub-protocol is exposed to didrelay as a
//! [`ProtocolService`] that hands out its action-events and state-events
//! through registered channels. These adapters only move events; they never
//! decide anything.

#![deny(unsafe_code)]

mod framework;
mod memory;

pub use framework::LoopbackFramework;
pub use memory::InMemoryProtocolService;

use didrelay_types::{ActionEvent, ProtocolName, StateEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel on which a service publishes its action-events.
pub type ActionSender = mpsc::UnboundedSender<ActionEvent>;

/// Channel on which a service publishes its state-events.
pub type StateSender = mpsc::UnboundedSender<StateEvent>;

/// A sub-protocol client of the framework.
pub trait ProtocolService: Send + Sync {
    /// Protocol identity carried by every event this service emits.
    fn name(&self) -> &ProtocolName;

    /// Register the consumer of action-events. Only one consumer may hold
    /// the decision for a message.
    fn register_action_event(&self, channel: ActionSender) -> Result<(), RegistrationError>;

    /// Register a consumer of state-events.
    fn register_msg_event(&self, channel: StateSender) -> Result<(), RegistrationError>;
}

/// Errors from event registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("action event channel already registered for {0}")]
    AlreadyRegistered(ProtocolName),

    #[error("lock poisoned")]
    LockError,
}

/// Errors from delivering events into didrelay.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no action event consumer registered for {0}")]
    NoActionConsumer(ProtocolName),

    #[error("event channel closed for {0}")]
    ChannelClosed(ProtocolName),

    #[error("lock poisoned")]
    LockError,
}

use didrelay_transport::RegistrationError;
use didrelay_types::{MessageType, ProtocolName};
use thiserror::Error;

/// Dispatcher failures. All of them are fatal to the process.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An event does not have the shape its protocol promises.
    #[error("protocol contract violation ({protocol} {message_type}): {reason}")]
    ContractViolation {
        protocol: ProtocolName,
        message_type: MessageType,
        reason: String,
    },

    #[error("event registration failed for {protocol}: {source}")]
    Registration {
        protocol: ProtocolName,
        source: RegistrationError,
    },

    #[error("no sub-protocol registered with the dispatcher")]
    NoProtocols,
}

/// Connection registry failures.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry lock poisoned")]
    LockPoisoned,
}

use thiserror::Error;

/// Errors raised while inspecting or decoding a DIDComm message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message is not a JSON object")]
    NotAnObject,

    #[error("message has no @type")]
    MissingType,

    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}

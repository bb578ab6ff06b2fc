use thiserror::Error;

/// Errors from invitation and attachment handling.
#[derive(Debug, Error)]
pub enum OobError {
    /// The requested invitation cannot be built as specified.
    #[error("invalid invitation spec: {0}")]
    InvalidInvitationSpec(String),

    #[error("attachment decode failed: {0}")]
    AttachmentDecode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

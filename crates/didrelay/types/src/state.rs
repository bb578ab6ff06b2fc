use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a connection attempt, as reported by the
/// connection-exchange protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Null,
    Invited,
    Requested,
    Responded,
    Completed,
    Abandoned,
}

impl ConnectionState {
    pub fn from_state_id(state_id: &str) -> Option<Self> {
        match state_id {
            "null" => Some(Self::Null),
            "invited" => Some(Self::Invited),
            "requested" => Some(Self::Requested),
            "responded" => Some(Self::Responded),
            "completed" => Some(Self::Completed),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Invited => "invited",
            Self::Requested => "requested",
            Self::Responded => "responded",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// No further transitions follow a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Only a completed connection can carry application traffic.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::policy::Verdict;
use chrono::{DateTime, Utc};
use didrelay_types::{MessageType, ProtocolName};
use serde::Serialize;

/// Observability record published by the dispatcher for every handled event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchRecord {
    Action {
        protocol: ProtocolName,
        message_type: MessageType,
        verdict: Verdict,
        #[serde(skip_serializing_if = "Option::is_none")]
        connection_id: Option<String>,
        at: DateTime<Utc>,
    },
    State {
        protocol: ProtocolName,
        connection_id: String,
        state_id: String,
        at: DateTime<Utc>,
    },
    /// A connection reached `completed` for the first time.
    ConnectionReady {
        connection_id: String,
        at: DateTime<Utc>,
    },
}

impl DispatchRecord {
    pub fn connection_id(&self) -> Option<&str> {
        match self {
            DispatchRecord::Action { connection_id, .. } => connection_id.as_deref(),
            DispatchRecord::State { connection_id, .. }
            | DispatchRecord::ConnectionReady { connection_id, .. } => Some(connection_id),
        }
    }
}

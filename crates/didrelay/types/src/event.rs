use crate::message::DidCommMsg;
use crate::protocol::{MessageType, ProtocolName};
use crate::state::ConnectionState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::oneshot;

/// Protocol-specific metadata attached to an event by the framework.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EventProperties {
    pub fn for_connection(connection_id: impl Into<String>) -> Self {
        Self {
            connection_id: Some(connection_id.into()),
            ..Default::default()
        }
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }
}

/// The decision reported back to the framework for one action event.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// The protocol may proceed, optionally with extra properties.
    Continued { properties: Option<EventProperties> },
    /// The protocol must abort with the given reason.
    Stopped { reason: String },
}

/// An inbound message awaiting an accept/reject decision.
///
/// [`ActionEvent::continue_with`] and [`ActionEvent::stop`] consume the event,
/// so at most one decision can ever be made for it. Dropping the event without
/// deciding leaves the framework's [`PendingAction`] without an outcome.
#[derive(Debug)]
pub struct ActionEvent {
    pub protocol: ProtocolName,
    pub message: DidCommMsg,
    pub properties: Option<EventProperties>,
    responder: oneshot::Sender<ActionOutcome>,
}

impl ActionEvent {
    /// Create an event together with the handle the framework waits on.
    pub fn new(
        protocol: ProtocolName,
        message: DidCommMsg,
        properties: Option<EventProperties>,
    ) -> (Self, PendingAction) {
        let (responder, receiver) = oneshot::channel();
        let pending = PendingAction {
            protocol: protocol.clone(),
            message_type: message.msg_type(),
            receiver,
        };
        let event = Self {
            protocol,
            message,
            properties,
            responder,
        };
        (event, pending)
    }

    pub fn message_type(&self) -> MessageType {
        self.message.msg_type()
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.properties.as_ref().and_then(EventProperties::connection_id)
    }

    /// Let the protocol proceed. Returns `false` if the framework stopped
    /// waiting for this event.
    pub fn continue_with(self, properties: Option<EventProperties>) -> bool {
        self.responder
            .send(ActionOutcome::Continued { properties })
            .is_ok()
    }

    /// Abort the protocol. Returns `false` if the framework stopped waiting
    /// for this event.
    pub fn stop(self, reason: impl Into<String>) -> bool {
        self.responder
            .send(ActionOutcome::Stopped {
                reason: reason.into(),
            })
            .is_ok()
    }
}

/// Framework-side handle for an [`ActionEvent`] that has been handed out.
#[derive(Debug)]
pub struct PendingAction {
    pub protocol: ProtocolName,
    pub message_type: MessageType,
    receiver: oneshot::Receiver<ActionOutcome>,
}

impl PendingAction {
    /// Wait for the decision. `None` means the event was dropped undecided.
    pub async fn outcome(self) -> Option<ActionOutcome> {
        self.receiver.await.ok()
    }
}

/// A lifecycle transition reported by a sub-protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    pub protocol: ProtocolName,
    pub connection_id: String,
    pub state_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl StateEvent {
    pub fn new(
        protocol: ProtocolName,
        connection_id: impl Into<String>,
        state_id: impl Into<String>,
    ) -> Self {
        Self {
            protocol,
            connection_id: connection_id.into(),
            state_id: state_id.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// The parsed connection state, if the identifier is a known one.
    pub fn state(&self) -> Option<ConnectionState> {
        ConnectionState::from_state_id(&self.state_id)
    }
}

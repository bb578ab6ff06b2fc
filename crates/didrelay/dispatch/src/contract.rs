//! Decoding obligations attached to policy entries.
//!
//! An accepted message is only acted on when its body and properties have the
//! shape the protocol promises. A mismatch means the framework and the router
//! disagree about the protocol, which no local decision can repair.

use crate::error::DispatchError;
use didrelay_types::{ActionEvent, ExchangeRequest};

/// What must hold for an accepted message before it is continued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageContract {
    /// Nothing beyond a well-formed envelope.
    #[default]
    Unchecked,
    /// Body decodes as a connection-exchange request and the properties name
    /// the connection being created.
    ExchangeRequest,
}

/// Details established while verifying a contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractFacts {
    pub connection_id: Option<String>,
    pub label: Option<String>,
}

impl MessageContract {
    pub fn verify(&self, event: &ActionEvent) -> Result<ContractFacts, DispatchError> {
        match self {
            MessageContract::Unchecked => Ok(ContractFacts {
                connection_id: event.connection_id().map(str::to_owned),
                label: None,
            }),
            MessageContract::ExchangeRequest => {
                let request: ExchangeRequest = event
                    .message
                    .decode()
                    .map_err(|e| violation(event, format!("undecodable request: {}", e)))?;

                let properties = event
                    .properties
                    .as_ref()
                    .ok_or_else(|| violation(event, "event carries no properties".to_string()))?;
                let connection_id = properties.connection_id().ok_or_else(|| {
                    violation(event, "event properties expose no connection id".to_string())
                })?;

                Ok(ContractFacts {
                    connection_id: Some(connection_id.to_string()),
                    label: Some(request.label),
                })
            }
        }
    }
}

fn violation(event: &ActionEvent, reason: String) -> DispatchError {
    DispatchError::ContractViolation {
        protocol: event.protocol.clone(),
        message_type: event.message_type(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didrelay_types::{msg_types, DidCommMsg, EventProperties, ProtocolName};
    use serde_json::json;

    fn event(body: serde_json::Value, properties: Option<EventProperties>) -> ActionEvent {
        let msg = DidCommMsg::new(body).unwrap();
        ActionEvent::new(ProtocolName::did_exchange(), msg, properties).0
    }

    fn request_body() -> serde_json::Value {
        serde_json::to_value(ExchangeRequest::new("alice")).unwrap()
    }

    #[test]
    fn exchange_request_yields_connection_and_label() {
        let facts = MessageContract::ExchangeRequest
            .verify(&event(request_body(), Some(EventProperties::for_connection("conn-42"))))
            .unwrap();
        assert_eq!(facts.connection_id.as_deref(), Some("conn-42"));
        assert_eq!(facts.label.as_deref(), Some("alice"));
    }

    #[test]
    fn undecodable_body_is_a_violation() {
        let body = json!({"@type": msg_types::DID_EXCHANGE_REQUEST, "label": 7});
        let err = MessageContract::ExchangeRequest
            .verify(&event(body, Some(EventProperties::for_connection("c"))))
            .unwrap_err();
        assert!(matches!(err, DispatchError::ContractViolation { .. }));
    }

    #[test]
    fn request_without_id_still_yields_connection() {
        let body = json!({"@type": msg_types::DID_EXCHANGE_REQUEST, "label": "alice"});
        let facts = MessageContract::ExchangeRequest
            .verify(&event(body, Some(EventProperties::for_connection("conn-42"))))
            .unwrap();
        assert_eq!(facts.connection_id.as_deref(), Some("conn-42"));
        assert_eq!(facts.label.as_deref(), Some("alice"));
    }

    #[test]
    fn missing_connection_id_is_a_violation() {
        let err = MessageContract::ExchangeRequest
            .verify(&event(request_body(), Some(EventProperties::default())))
            .unwrap_err();
        assert!(err.to_string().contains("connection id"));

        let err = MessageContract::ExchangeRequest
            .verify(&event(request_body(), None))
            .unwrap_err();
        assert!(matches!(err, DispatchError::ContractViolation { .. }));
    }

    #[test]
    fn unchecked_passes_through_connection_id() {
        let body = json!({"@type": msg_types::MEDIATE_REQUEST});
        let facts = MessageContract::Unchecked.verify(&event(body.clone(), None)).unwrap();
        assert_eq!(facts, ContractFacts::default());

        let facts = MessageContract::Unchecked
            .verify(&event(body, Some(EventProperties::for_connection("c"))))
            .unwrap();
        assert_eq!(facts.connection_id.as_deref(), Some("c"));
    }
}

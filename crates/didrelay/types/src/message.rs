use crate::error::MessageError;
use crate::protocol::{msg_types, MessageType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw inbound DIDComm message.
///
/// The body stays undecoded until a consumer asks for a concrete shape with
/// [`DidCommMsg::decode`]. Construction only checks that the message is a JSON
/// object carrying a string `@type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct DidCommMsg(Value);

impl DidCommMsg {
    pub fn new(value: Value) -> Result<Self, MessageError> {
        let object = value.as_object().ok_or(MessageError::NotAnObject)?;
        match object.get("@type") {
            Some(Value::String(_)) => Ok(Self(value)),
            _ => Err(MessageError::MissingType),
        }
    }

    /// Build a message from any serializable document.
    pub fn from_document<T: Serialize>(document: &T) -> Result<Self, MessageError> {
        Self::new(serde_json::to_value(document)?)
    }

    /// The `@type` member.
    pub fn msg_type(&self) -> MessageType {
        MessageType::new(self.type_str())
    }

    fn type_str(&self) -> &str {
        self.0.get("@type").and_then(Value::as_str).unwrap_or_default()
    }

    /// The `@id` member, if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("@id").and_then(Value::as_str)
    }

    /// Decode the message body into a concrete protocol message.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, MessageError> {
        Ok(T::deserialize(&self.0)?)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl TryFrom<Value> for DidCommMsg {
    type Error = MessageError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DidCommMsg> for Value {
    fn from(msg: DidCommMsg) -> Self {
        msg.0
    }
}

/// Message threading decorator (`~thread`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pthid: Option<String>,
}

/// Connection-exchange request sent by a peer that accepted one of our
/// invitations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@type")]
    pub msg_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    #[serde(rename = "did_doc~attach", default, skip_serializing_if = "Option::is_none")]
    pub did_doc_attach: Option<Value>,
    #[serde(rename = "~thread", default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

impl ExchangeRequest {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: msg_types::DID_EXCHANGE_REQUEST.to_string(),
            label: label.into(),
            goal_code: None,
            goal: None,
            did: None,
            did_doc_attach: None,
            thread: None,
        }
    }
}

/// Mediator-registration request: asks the router to relay messages for the
/// sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediateRequest {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub msg_type: String,
}

impl MediateRequest {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: msg_types::MEDIATE_REQUEST.to_string(),
        }
    }
}

impl Default for MediateRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_messages() {
        let err = DidCommMsg::new(json!(["not", "a", "message"])).unwrap_err();
        assert!(matches!(err, MessageError::NotAnObject));
    }

    #[test]
    fn rejects_messages_without_type() {
        let err = DidCommMsg::new(json!({"@id": "1"})).unwrap_err();
        assert!(matches!(err, MessageError::MissingType));

        let err = DidCommMsg::new(json!({"@type": 7})).unwrap_err();
        assert!(matches!(err, MessageError::MissingType));
    }

    #[test]
    fn exposes_type_and_id() {
        let msg = DidCommMsg::new(json!({
            "@id": "abc",
            "@type": msg_types::DID_EXCHANGE_REQUEST,
        }))
        .unwrap();
        assert_eq!(msg.msg_type().as_str(), msg_types::DID_EXCHANGE_REQUEST);
        assert_eq!(msg.id(), Some("abc"));
    }

    #[test]
    fn decodes_exchange_request() {
        let request = ExchangeRequest::new("alice");
        let msg = DidCommMsg::from_document(&request).unwrap();
        let decoded: ExchangeRequest = msg.decode().unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.label, "alice");
    }

    #[test]
    fn decode_fails_on_wrong_shape() {
        let msg = DidCommMsg::new(json!({
            "@type": msg_types::DID_EXCHANGE_REQUEST,
            "label": 7,
        }))
        .unwrap();
        let err = msg.decode::<ExchangeRequest>().unwrap_err();
        assert!(matches!(err, MessageError::Decode(_)));
    }

    #[test]
    fn decode_tolerates_missing_id() {
        let msg = DidCommMsg::new(json!({
            "@type": msg_types::DID_EXCHANGE_REQUEST,
            "label": "alice",
        }))
        .unwrap();
        let request: ExchangeRequest = msg.decode().unwrap();
        assert_eq!(request.id, "");
        assert_eq!(request.label, "alice");
    }

    #[test]
    fn deserialization_validates_type() {
        let result: Result<DidCommMsg, _> = serde_json::from_str(r#"{"label":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn mediate_request_has_expected_type() {
        let request = MediateRequest::new();
        assert_eq!(request.msg_type, msg_types::MEDIATE_REQUEST);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["@type"], msg_types::MEDIATE_REQUEST);
        assert!(json["@id"].is_string());
    }
}

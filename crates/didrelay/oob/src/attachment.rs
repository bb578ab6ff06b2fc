//! Attachment codec.
//!
//! Byte payloads travel base64-encoded; structured documents are embedded
//! as JSON without a further encoding pass. Every attachment carries exactly
//! one of the two forms.

use crate::error::OobError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `data` block of an attachment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

/// An invitation attachment (`requests~attach` entry).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mime-type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: AttachmentData,
}

impl Attachment {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Check that exactly one encoding form is populated.
    pub fn validate(&self) -> Result<(), OobError> {
        match (&self.data.base64, &self.data.json) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(OobError::InvalidInvitationSpec(format!(
                "attachment {} carries both base64 and json data",
                self.id
            ))),
            (None, None) => Err(OobError::InvalidInvitationSpec(format!(
                "attachment {} carries no data",
                self.id
            ))),
        }
    }
}

/// A decoded attachment payload.
#[derive(Clone, Debug, PartialEq)]
pub enum AttachmentPayload {
    /// Opaque bytes, carried as base64.
    Bytes(Vec<u8>),
    /// A structured document, embedded as-is.
    Json(Value),
}

impl AttachmentPayload {
    /// Embed a serializable document directly.
    pub fn json<T: Serialize>(document: &T) -> Result<Self, OobError> {
        Ok(Self::Json(serde_json::to_value(document)?))
    }

    /// Serialize a document and carry the resulting bytes as base64.
    pub fn json_as_base64<T: Serialize>(document: &T) -> Result<Self, OobError> {
        Ok(Self::Bytes(serde_json::to_vec(document)?))
    }
}

/// Encode a payload into an attachment with a fresh id.
pub fn encode(payload: AttachmentPayload) -> Attachment {
    let data = match payload {
        AttachmentPayload::Bytes(bytes) => AttachmentData {
            base64: Some(STANDARD.encode(bytes)),
            json: None,
        },
        AttachmentPayload::Json(document) => AttachmentData {
            base64: None,
            json: Some(document),
        },
    };

    Attachment {
        id: uuid::Uuid::new_v4().to_string(),
        description: None,
        mime_type: None,
        data,
    }
}

/// Recover the payload carried by an attachment.
pub fn decode(attachment: &Attachment) -> Result<AttachmentPayload, OobError> {
    attachment.validate()?;
    match (&attachment.data.base64, &attachment.data.json) {
        (Some(encoded), None) => STANDARD
            .decode(encoded)
            .map(AttachmentPayload::Bytes)
            .map_err(|e| OobError::AttachmentDecode(format!("{}: {}", attachment.id, e))),
        (None, Some(document)) => Ok(AttachmentPayload::Json(document.clone())),
        _ => Err(OobError::InvalidInvitationSpec(format!(
            "attachment {} has no single encoding",
            attachment.id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn bytes_use_base64_form() {
        let attachment = encode(AttachmentPayload::Bytes(b"hello".to_vec()));
        assert_eq!(attachment.data.base64.as_deref(), Some("aGVsbG8="));
        assert!(attachment.data.json.is_none());
    }

    #[test]
    fn documents_are_embedded() {
        let doc = json!({"@type": "registration-request"});
        let attachment = encode(AttachmentPayload::json(&doc).unwrap());
        assert_eq!(attachment.data.json, Some(doc));
        assert!(attachment.data.base64.is_none());
    }

    #[test]
    fn json_as_base64_round_trips_serialized_bytes() {
        let doc = json!({"@type": "registration-request"});
        let attachment = encode(AttachmentPayload::json_as_base64(&doc).unwrap());
        match decode(&attachment).unwrap() {
            AttachmentPayload::Bytes(bytes) => {
                assert_eq!(bytes, serde_json::to_vec(&doc).unwrap());
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn attachments_get_distinct_ids() {
        let a = encode(AttachmentPayload::Bytes(vec![1]));
        let b = encode(AttachmentPayload::Bytes(vec![1]));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn both_forms_rejected() {
        let mut attachment = encode(AttachmentPayload::Bytes(vec![1, 2]));
        attachment.data.json = Some(json!({}));
        assert!(matches!(
            decode(&attachment),
            Err(OobError::InvalidInvitationSpec(_))
        ));
    }

    #[test]
    fn missing_form_rejected() {
        let mut attachment = encode(AttachmentPayload::Bytes(vec![1, 2]));
        attachment.data.base64 = None;
        assert!(matches!(
            attachment.validate(),
            Err(OobError::InvalidInvitationSpec(_))
        ));
    }

    #[test]
    fn corrupt_base64_is_a_decode_error() {
        let mut attachment = encode(AttachmentPayload::Bytes(vec![1, 2]));
        attachment.data.base64 = Some("!!not base64!!".into());
        assert!(matches!(decode(&attachment), Err(OobError::AttachmentDecode(_))));
    }

    #[test]
    fn wire_field_names() {
        let attachment = encode(AttachmentPayload::Bytes(vec![0]))
            .with_description("mediation request")
            .with_mime_type("application/json");
        let json = serde_json::to_value(&attachment).unwrap();
        assert!(json["@id"].is_string());
        assert_eq!(json["mime-type"], "application/json");
        assert_eq!(json["description"], "mediation request");
        assert_eq!(json["data"]["base64"], "AA==");
        assert!(json["data"].get("json").is_none());
    }

    proptest! {
        #[test]
        fn byte_payloads_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let attachment = encode(AttachmentPayload::Bytes(bytes.clone()));
            prop_assert_eq!(decode(&attachment).unwrap(), AttachmentPayload::Bytes(bytes));
        }

        #[test]
        fn document_payloads_round_trip(
            key in "[a-z@]{1,12}",
            value in any::<i64>(),
            text in ".{0,32}",
        ) {
            let mut map = serde_json::Map::new();
            map.insert(key, json!(value));
            map.insert("text".into(), json!(text));
            let doc = Value::Object(map);
            let attachment = encode(AttachmentPayload::Json(doc.clone()));
            prop_assert_eq!(decode(&attachment).unwrap(), AttachmentPayload::Json(doc));
        }
    }
}

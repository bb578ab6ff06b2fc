use crate::attachment::{self, Attachment, AttachmentPayload};
use crate::error::OobError;
use didrelay_types::msg_types;
use serde::{Deserialize, Serialize};

/// Handshake protocol advertised by router invitations.
pub const DID_EXCHANGE_HANDSHAKE: &str = "https://didcomm.org/didexchange/1.0";

/// Inline DIDComm service block of an invitation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub recipient_keys: Vec<String>,
    pub service_endpoint: String,
}

impl InvitationService {
    pub fn inline(service_endpoint: impl Into<String>) -> Self {
        Self {
            id: "#inline".to_string(),
            service_type: "did-communication".to_string(),
            recipient_keys: Vec::new(),
            service_endpoint: service_endpoint.into(),
        }
    }
}

/// An out-of-band invitation. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    msg_type: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    goal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default)]
    accept: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    handshake_protocols: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    services: Vec<InvitationService>,
    #[serde(rename = "requests~attach", default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

impl Invitation {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn goal_code(&self) -> Option<&str> {
        self.goal_code.as_deref()
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    /// Sender identity (`from`).
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Accepted media-type profiles, in preference order.
    pub fn accept(&self) -> &[String] {
        &self.accept
    }

    pub fn handshake_protocols(&self) -> &[String] {
        &self.handshake_protocols
    }

    pub fn services(&self) -> &[InvitationService] {
        &self.services
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

/// Builder for [`Invitation`].
///
/// Validation happens in [`build`](Self::build); nothing is returned on
/// failure.
#[derive(Clone, Debug, Default)]
pub struct InvitationBuilder {
    label: String,
    goal_code: Option<String>,
    goal: Option<String>,
    sender: Option<String>,
    accept: Vec<String>,
    handshake_protocols: Vec<String>,
    services: Vec<InvitationService>,
    attachments: Vec<Attachment>,
}

impl InvitationBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn accept<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept.extend(profiles.into_iter().map(Into::into));
        self
    }

    pub fn goal_code(mut self, goal_code: impl Into<String>) -> Self {
        self.goal_code = Some(goal_code.into());
        self
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn sender(mut self, did: impl Into<String>) -> Self {
        self.sender = Some(did.into());
        self
    }

    pub fn handshake_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.handshake_protocols.push(protocol.into());
        self
    }

    pub fn service(mut self, service: InvitationService) -> Self {
        self.services.push(service);
        self
    }

    /// Encode and append a payload.
    pub fn attachment(self, payload: AttachmentPayload) -> Self {
        self.attach(attachment::encode(payload))
    }

    /// Append an already-encoded attachment. It is validated on build.
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn build(self) -> Result<Invitation, OobError> {
        if self.goal_code.is_some() && self.accept.is_empty() {
            return Err(OobError::InvalidInvitationSpec(
                "goal code requires at least one accepted profile".to_string(),
            ));
        }
        for attachment in &self.attachments {
            attachment.validate()?;
        }

        Ok(Invitation {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: msg_types::OOB_INVITATION.to_string(),
            label: self.label,
            goal_code: self.goal_code,
            goal: self.goal,
            from: self.sender,
            accept: self.accept,
            handshake_protocols: self.handshake_protocols,
            services: self.services,
            attachments: self.attachments,
        })
    }
}

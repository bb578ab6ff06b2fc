use crate::attachment::{self, AttachmentPayload};
use crate::error::OobError;
use crate::invitation::{Invitation, InvitationBuilder, InvitationService, DID_EXCHANGE_HANDSHAKE};
use didrelay_types::FrameworkContext;
use std::sync::Arc;
use tracing::debug;

/// Caller-supplied parts of an invitation.
#[derive(Clone, Debug, Default)]
pub struct InvitationOptions {
    pub label: String,
    pub goal_code: Option<String>,
    pub goal: Option<String>,
    /// `None` advertises the framework's media-type profiles.
    pub accept: Option<Vec<String>>,
    pub attachments: Vec<AttachmentPayload>,
    /// Human-readable description applied to every attachment.
    pub attachment_description: Option<String>,
    /// Media type applied to every attachment.
    pub attachment_mime_type: Option<String>,
}

impl InvitationOptions {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

/// Creates invitations that point peers at this framework.
pub struct InvitationFactory {
    context: Arc<FrameworkContext>,
}

impl InvitationFactory {
    pub fn new(context: Arc<FrameworkContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &FrameworkContext {
        &self.context
    }

    pub fn create(&self, options: InvitationOptions) -> Result<Invitation, OobError> {
        let accept = options
            .accept
            .unwrap_or_else(|| self.context.media_type_profiles.clone());

        let mut builder = InvitationBuilder::new(options.label)
            .accept(accept)
            .handshake_protocol(DID_EXCHANGE_HANDSHAKE)
            .service(InvitationService::inline(
                self.context.service_endpoint.clone(),
            ));

        if let Some(goal_code) = options.goal_code {
            builder = builder.goal_code(goal_code);
        }
        if let Some(goal) = options.goal {
            builder = builder.goal(goal);
        }
        if let Some(did) = &self.context.sender_did {
            builder = builder.sender(did.clone());
        }

        for payload in options.attachments {
            let mut attachment = attachment::encode(payload);
            attachment.description = options.attachment_description.clone();
            attachment.mime_type = options.attachment_mime_type.clone();
            builder = builder.attach(attachment);
        }

        let invitation = builder.build()?;
        debug!(
            invitation_id = %invitation.id(),
            attachments = invitation.attachments().len(),
            "Invitation created"
        );
        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::decode;
    use didrelay_types::DIDCOMM_V2_PROFILE;
    use serde_json::json;

    fn factory() -> InvitationFactory {
        InvitationFactory::new(Arc::new(
            FrameworkContext::new("ws://localhost:5001").with_sender_did("did:example:router"),
        ))
    }

    #[test]
    fn fills_defaults_from_context() {
        let invitation = factory().create(InvitationOptions::labelled("Router")).unwrap();
        assert_eq!(invitation.accept(), &[DIDCOMM_V2_PROFILE.to_string()]);
        assert_eq!(invitation.sender(), Some("did:example:router"));
        assert_eq!(invitation.services()[0].service_endpoint, "ws://localhost:5001");
        assert_eq!(invitation.handshake_protocols(), &[DID_EXCHANGE_HANDSHAKE.to_string()]);
    }

    #[test]
    fn explicit_empty_profiles_with_goal_code_fail() {
        let options = InvitationOptions {
            label: "Router".into(),
            goal_code: Some("p2p-messaging".into()),
            accept: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(
            factory().create(options),
            Err(OobError::InvalidInvitationSpec(_))
        ));
    }

    #[test]
    fn embeds_registration_request_as_base64() {
        let request = json!({"@type": "registration-request"});
        let options = InvitationOptions {
            label: "Router".into(),
            attachments: vec![AttachmentPayload::json_as_base64(&request).unwrap()],
            attachment_mime_type: Some("application/json".into()),
            ..Default::default()
        };

        let invitation = factory().create(options).unwrap();
        assert_eq!(invitation.attachments().len(), 1);
        let attachment = &invitation.attachments()[0];
        assert_eq!(attachment.mime_type.as_deref(), Some("application/json"));
        assert_eq!(
            decode(attachment).unwrap(),
            AttachmentPayload::Bytes(serde_json::to_vec(&request).unwrap())
        );
    }
}

use serde::{Deserialize, Serialize};

/// Default media-type profile advertised in invitations.
pub const DIDCOMM_V2_PROFILE: &str = "didcomm/v2";

/// Read-only view of the framework the router runs on.
///
/// Built once at startup and shared (behind an `Arc`) by the dispatcher and by
/// every HTTP worker. Nothing in didrelay mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkContext {
    /// Inbound endpoint peers use to reach this router.
    pub service_endpoint: String,
    /// Media-type profiles the framework can speak, in preference order.
    pub media_type_profiles: Vec<String>,
    /// DID this router presents as the sender of its invitations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_did: Option<String>,
}

impl FrameworkContext {
    pub fn new(service_endpoint: impl Into<String>) -> Self {
        Self {
            service_endpoint: service_endpoint.into(),
            media_type_profiles: vec![DIDCOMM_V2_PROFILE.to_string()],
            sender_did: None,
        }
    }

    pub fn with_media_type_profiles(mut self, profiles: Vec<String>) -> Self {
        self.media_type_profiles = profiles;
        self
    }

    pub fn with_sender_did(mut self, did: impl Into<String>) -> Self {
        self.sender_did = Some(did.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_didcomm_v2() {
        let ctx = FrameworkContext::new("ws://localhost:5001");
        assert_eq!(ctx.media_type_profiles, vec![DIDCOMM_V2_PROFILE.to_string()]);
        assert!(ctx.sender_did.is_none());
    }
}

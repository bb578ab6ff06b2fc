use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known DIDComm message types.
pub mod msg_types {
    /// Connection-exchange protocol specification prefix.
    pub const DID_EXCHANGE_SPEC: &str = "https://didcomm.org/didexchange/1.0/";
    /// Connection-exchange request.
    pub const DID_EXCHANGE_REQUEST: &str = "https://didcomm.org/didexchange/1.0/request";
    /// Connection-exchange invitation.
    pub const DID_EXCHANGE_INVITATION: &str = "https://didcomm.org/didexchange/1.0/invitation";
    /// Mediator-registration (coordinate mediation) request.
    pub const MEDIATE_REQUEST: &str =
        "https://didcomm.org/coordinatemediation/1.0/mediate-request";
    /// Out-of-band invitation.
    pub const OOB_INVITATION: &str = "https://didcomm.org/out-of-band/1.0/invitation";
}

/// Identity of a sub-protocol the router participates in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolName(String);

impl ProtocolName {
    /// Connection-exchange protocol name.
    pub const DID_EXCHANGE: &'static str = "didexchange";
    /// Mediator-registration protocol name.
    pub const MEDIATOR: &'static str = "routecoordination";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn did_exchange() -> Self {
        Self::new(Self::DID_EXCHANGE)
    }

    pub fn mediator() -> Self {
        Self::new(Self::MEDIATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProtocolName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A DIDComm message type URI (the `@type` member of a message).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageType(String);

impl MessageType {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageType {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_protocol_names() {
        assert_eq!(ProtocolName::did_exchange().as_str(), "didexchange");
        assert_eq!(ProtocolName::mediator().as_str(), "routecoordination");
    }

    #[test]
    fn exchange_types_share_spec_prefix() {
        assert!(msg_types::DID_EXCHANGE_REQUEST.starts_with(msg_types::DID_EXCHANGE_SPEC));
        assert!(msg_types::DID_EXCHANGE_INVITATION.starts_with(msg_types::DID_EXCHANGE_SPEC));
    }

    #[test]
    fn names_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ProtocolName::mediator()).unwrap();
        assert_eq!(json, "\"routecoordination\"");
        let ty: MessageType = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(ty.as_str(), "x");
    }
}

//! Decision policy: which inbound protocol messages the router accepts.
//!
//! The policy is a total function over `(protocol, message type)`. Pairs with
//! an entry map to that entry's verdict; every other pair is [`Verdict::Ignore`].
//! Supporting a new protocol means adding entries, not touching the
//! dispatcher.

use crate::contract::MessageContract;
use didrelay_types::{msg_types, MessageType, ProtocolName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Stop reason for inbound connection-exchange invitations in the responder
/// role.
pub const INVITATION_REJECTED: &str = "invitation rejected";

/// Outcome of evaluating one action-event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    /// Let the protocol advance.
    Continue,
    /// Abort the protocol with a human-readable reason.
    Stop(String),
    /// The event needs no decision.
    Ignore,
}

impl Verdict {
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::Continue => "continue",
            Verdict::Stop(_) => "stop",
            Verdict::Ignore => "ignore",
        }
    }
}

/// The part this router plays in connection establishment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolRole {
    /// Answers requests; inbound invitations are refused.
    #[default]
    Responder,
    /// Also accepts invitations addressed to it.
    Inviter,
}

impl fmt::Display for ProtocolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolRole::Responder => f.write_str("responder"),
            ProtocolRole::Inviter => f.write_str("inviter"),
        }
    }
}

impl FromStr for ProtocolRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "responder" => Ok(ProtocolRole::Responder),
            "inviter" => Ok(ProtocolRole::Inviter),
            other => Err(format!("Unknown protocol role: {}", other)),
        }
    }
}

/// One policy table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyRule {
    pub verdict: Verdict,
    /// Checked by the dispatcher before a `Continue` is acted on.
    pub contract: MessageContract,
}

impl PolicyRule {
    pub fn accept() -> Self {
        Self {
            verdict: Verdict::Continue,
            contract: MessageContract::Unchecked,
        }
    }

    pub fn accept_checked(contract: MessageContract) -> Self {
        Self {
            verdict: Verdict::Continue,
            contract,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Stop(reason.into()),
            contract: MessageContract::Unchecked,
        }
    }
}

/// Table-driven accept/reject policy.
#[derive(Clone, Debug, Default)]
pub struct DecisionPolicy {
    rules: HashMap<ProtocolName, HashMap<MessageType, PolicyRule>>,
}

impl DecisionPolicy {
    /// A policy that ignores everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The router policy for a role.
    pub fn for_role(role: ProtocolRole) -> Self {
        let invitation_rule = match role {
            ProtocolRole::Responder => PolicyRule::reject(INVITATION_REJECTED),
            ProtocolRole::Inviter => PolicyRule::accept(),
        };

        Self::empty()
            .with_rule(
                ProtocolName::did_exchange(),
                MessageType::new(msg_types::DID_EXCHANGE_REQUEST),
                PolicyRule::accept_checked(MessageContract::ExchangeRequest),
            )
            .with_rule(
                ProtocolName::did_exchange(),
                MessageType::new(msg_types::DID_EXCHANGE_INVITATION),
                invitation_rule,
            )
            .with_rule(
                ProtocolName::mediator(),
                MessageType::new(msg_types::MEDIATE_REQUEST),
                PolicyRule::accept(),
            )
    }

    /// Add or replace the entry for a `(protocol, message type)` pair.
    pub fn with_rule(
        mut self,
        protocol: ProtocolName,
        message_type: MessageType,
        rule: PolicyRule,
    ) -> Self {
        self.rules
            .entry(protocol)
            .or_default()
            .insert(message_type, rule);
        self
    }

    pub fn rule(&self, protocol: &ProtocolName, message_type: &MessageType) -> Option<&PolicyRule> {
        self.rules
            .get(protocol)
            .and_then(|by_type| by_type.get(message_type))
    }

    pub fn decide(&self, protocol: &ProtocolName, message_type: &MessageType) -> Verdict {
        self.rule(protocol, message_type)
            .map(|rule| rule.verdict.clone())
            .unwrap_or(Verdict::Ignore)
    }

    pub fn contract(&self, protocol: &ProtocolName, message_type: &MessageType) -> MessageContract {
        self.rule(protocol, message_type)
            .map(|rule| rule.contract)
            .unwrap_or_default()
    }

    /// Number of entries across all protocols.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

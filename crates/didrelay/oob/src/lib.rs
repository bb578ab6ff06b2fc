//! Out-of-band invitations.
//!
//! An invitation is a self-contained document a peer can act on without an
//! existing connection: it names who is inviting, which DIDComm profiles and
//! handshake protocols are accepted, where to reach the inviter, and may carry
//! embedded requests as attachments (for example a mediation request).
//!
//! - [`attachment`]: encodes payloads as either base64 bytes or embedded JSON
//! - [`InvitationBuilder`]: validated construction of a single [`Invitation`]
//! - [`InvitationFactory`]: fills builder defaults from the [`FrameworkContext`]
//!
//! [`FrameworkContext`]: didrelay_types::FrameworkContext

#![deny(unsafe_code)]

pub mod attachment;
pub mod error;
pub mod factory;
pub mod invitation;

pub use attachment::{decode, encode, Attachment, AttachmentData, AttachmentPayload};
pub use error::OobError;
pub use factory::{InvitationFactory, InvitationOptions};
pub use invitation::{Invitation, InvitationBuilder, InvitationService, DID_EXCHANGE_HANDSHAKE};

//! Protocol vocabulary and event model shared by every didrelay crate.
//!
//! The framework that owns the DIDComm transport reports inbound traffic as
//! two kinds of events:
//!
//! - [`ActionEvent`]: an inbound message that needs an explicit accept/reject
//!   decision before the sub-protocol state machine may advance.
//! - [`StateEvent`]: a read-only notification that a connection attempt moved
//!   to a new lifecycle state.
//!
//! Both carry a [`ProtocolName`] and are routed by the dispatcher on that name
//! and on the message type.

#![deny(unsafe_code)]

pub mod context;
pub mod error;
pub mod event;
pub mod message;
pub mod protocol;
pub mod state;

pub use context::{FrameworkContext, DIDCOMM_V2_PROFILE};
pub use error::MessageError;
pub use event::{ActionEvent, ActionOutcome, EventProperties, PendingAction, StateEvent};
pub use message::{DidCommMsg, ExchangeRequest, MediateRequest, Thread};
pub use protocol::{msg_types, MessageType, ProtocolName};
pub use state::ConnectionState;

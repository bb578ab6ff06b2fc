//! Protocol event dispatch.
//!
//! One [`Dispatcher`] consumes the action-events and state-events of every
//! registered sub-protocol on a single ordered loop:
//!
//! - action-events go to the [`DecisionPolicy`], a table from
//!   `(protocol, message type)` to a [`Verdict`], and the verdict is reported
//!   back through the event's continue/stop handle
//! - state-events go to the [`LifecycleObserver`], which marks completed
//!   connections usable in the [`ConnectionRegistry`]
//!
//! Events are handled one at a time, so two decisions can never race for the
//! same pending action.

#![deny(unsafe_code)]

pub mod contract;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod policy;
pub mod record;
pub mod registry;

pub use contract::{ContractFacts, MessageContract};
pub use dispatcher::{DispatchSummary, Dispatcher, DEFAULT_RECORD_CAPACITY};
pub use error::{DispatchError, RegistryError};
pub use observer::{LifecycleObserver, Observation};
pub use policy::{DecisionPolicy, PolicyRule, ProtocolRole, Verdict, INVITATION_REJECTED};
pub use record::DispatchRecord;
pub use registry::{ConnectionRegistry, InMemoryConnectionRegistry};

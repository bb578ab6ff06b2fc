use crate::registry::{ConnectionRegistry, InMemoryConnectionRegistry};
use didrelay_types::{ConnectionState, StateEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the observer concluded from one state-event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The connection just became usable.
    Completed(String),
    /// A repeated completion for a connection already usable.
    AlreadyCompleted(String),
    /// Any other recognised state.
    Transition(ConnectionState),
    /// A state identifier outside the known vocabulary.
    Unrecognized(String),
}

/// Notification sink for lifecycle transitions.
///
/// Never rejects a transition. Registry failures are logged and the event is
/// reported as a plain transition.
pub struct LifecycleObserver {
    registry: Arc<dyn ConnectionRegistry>,
}

impl LifecycleObserver {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryConnectionRegistry::new()))
    }

    pub fn registry(&self) -> Arc<dyn ConnectionRegistry> {
        self.registry.clone()
    }

    pub fn observe(&self, event: &StateEvent) -> Observation {
        let Some(state) = event.state() else {
            debug!(
                protocol = %event.protocol,
                connection_id = %event.connection_id,
                state = %event.state_id,
                "Unrecognized state"
            );
            return Observation::Unrecognized(event.state_id.clone());
        };

        debug!(
            protocol = %event.protocol,
            connection_id = %event.connection_id,
            state = %state,
            "State transition"
        );

        if let Err(e) = self.registry.record_state(&event.connection_id, state) {
            warn!(connection_id = %event.connection_id, error = %e, "Failed to record state");
        }

        if !state.is_usable() {
            return Observation::Transition(state);
        }

        // An abandoned attempt never becomes usable.
        if let Ok(Some(ConnectionState::Abandoned)) = self.registry.state_of(&event.connection_id) {
            return Observation::Transition(ConnectionState::Abandoned);
        }

        match self.registry.mark_usable(&event.connection_id) {
            Ok(true) => {
                info!(connection_id = %event.connection_id, "Completed connection");
                Observation::Completed(event.connection_id.clone())
            }
            Ok(false) => Observation::AlreadyCompleted(event.connection_id.clone()),
            Err(e) => {
                warn!(
                    connection_id = %event.connection_id,
                    error = %e,
                    "Failed to mark connection usable"
                );
                Observation::Transition(state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didrelay_types::ProtocolName;

    fn state(connection_id: &str, state_id: &str) -> StateEvent {
        StateEvent::new(ProtocolName::did_exchange(), connection_id, state_id)
    }

    #[test]
    fn completion_is_reported_once() {
        let observer = LifecycleObserver::in_memory();
        assert_eq!(
            observer.observe(&state("conn-7", "completed")),
            Observation::Completed("conn-7".into())
        );
        assert_eq!(
            observer.observe(&state("conn-7", "completed")),
            Observation::AlreadyCompleted("conn-7".into())
        );
        assert!(observer.registry().is_usable("conn-7").unwrap());
    }

    #[test]
    fn non_terminal_states_are_recorded_only() {
        let observer = LifecycleObserver::in_memory();
        assert_eq!(
            observer.observe(&state("conn-1", "requested")),
            Observation::Transition(ConnectionState::Requested)
        );
        let registry = observer.registry();
        assert_eq!(registry.state_of("conn-1").unwrap(), Some(ConnectionState::Requested));
        assert!(!registry.is_usable("conn-1").unwrap());
    }

    #[test]
    fn abandoned_is_not_usable() {
        let observer = LifecycleObserver::in_memory();
        assert_eq!(
            observer.observe(&state("conn-2", "abandoned")),
            Observation::Transition(ConnectionState::Abandoned)
        );
        assert!(observer.registry().usable_connections().unwrap().is_empty());
    }

    #[test]
    fn late_completion_of_abandoned_attempt_is_ignored() {
        let observer = LifecycleObserver::in_memory();
        observer.observe(&state("conn-4", "abandoned"));
        assert_eq!(
            observer.observe(&state("conn-4", "completed")),
            Observation::Transition(ConnectionState::Abandoned)
        );
        assert!(!observer.registry().is_usable("conn-4").unwrap());
    }

    #[test]
    fn unknown_states_are_tolerated() {
        let observer = LifecycleObserver::in_memory();
        assert_eq!(
            observer.observe(&state("conn-3", "post-state")),
            Observation::Unrecognized("post-state".into())
        );
        assert_eq!(observer.registry().state_of("conn-3").unwrap(), None);
    }
}

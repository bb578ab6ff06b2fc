use crate::error::DispatchError;
use crate::observer::{LifecycleObserver, Observation};
use crate::policy::{DecisionPolicy, Verdict};
use crate::record::DispatchRecord;
use crate::registry::ConnectionRegistry;
use didrelay_transport::{ActionSender, ProtocolService, StateSender};
use didrelay_types::{ActionEvent, ProtocolName, StateEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};

/// Default capacity of the observability record channel.
pub const DEFAULT_RECORD_CAPACITY: usize = 256;

/// Counters reported when the dispatch loop ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub actions: u64,
    pub continued: u64,
    pub stopped: u64,
    pub ignored: u64,
    pub states: u64,
    pub completed: u64,
}

/// Per-event handling, shared by the loop and direct callers.
struct EventHandler {
    policy: DecisionPolicy,
    observer: LifecycleObserver,
    records: broadcast::Sender<DispatchRecord>,
    summary: DispatchSummary,
}

impl EventHandler {
    fn handle_action(&mut self, event: ActionEvent) -> Result<Verdict, DispatchError> {
        let protocol = event.protocol.clone();
        let message_type = event.message_type();
        debug!(protocol = %protocol, message_type = %message_type, "Received action event");

        let verdict = self.policy.decide(&protocol, &message_type);

        let (connection_id, label) = match verdict {
            Verdict::Continue => {
                let contract = self.policy.contract(&protocol, &message_type);
                match contract.verify(&event) {
                    Ok(facts) => (facts.connection_id, facts.label),
                    Err(e) => {
                        error!(
                            protocol = %protocol,
                            message_type = %message_type,
                            error = %e,
                            "Protocol contract violated"
                        );
                        return Err(e);
                    }
                }
            }
            _ => (event.connection_id().map(str::to_owned), None),
        };

        match &verdict {
            Verdict::Continue => {
                info!(
                    protocol = %protocol,
                    connection_id = connection_id.as_deref(),
                    label = label.as_deref(),
                    "Accepted {}",
                    message_type
                );
                if !event.continue_with(None) {
                    warn!(protocol = %protocol, "Framework stopped waiting before continue");
                }
                self.summary.continued += 1;
            }
            Verdict::Stop(reason) => {
                info!(protocol = %protocol, reason = %reason, "Rejected {}", message_type);
                if !event.stop(reason.clone()) {
                    warn!(protocol = %protocol, "Framework stopped waiting before stop");
                }
                self.summary.stopped += 1;
            }
            Verdict::Ignore => {
                debug!(protocol = %protocol, message_type = %message_type, "No decision required");
                self.summary.ignored += 1;
            }
        }
        self.summary.actions += 1;

        self.emit(DispatchRecord::Action {
            protocol,
            message_type,
            verdict: verdict.clone(),
            connection_id,
            at: chrono::Utc::now(),
        });

        Ok(verdict)
    }

    fn handle_state(&mut self, event: &StateEvent) -> Observation {
        let observation = self.observer.observe(event);
        self.summary.states += 1;

        self.emit(DispatchRecord::State {
            protocol: event.protocol.clone(),
            connection_id: event.connection_id.clone(),
            state_id: event.state_id.clone(),
            at: chrono::Utc::now(),
        });

        if let Observation::Completed(connection_id) = &observation {
            self.summary.completed += 1;
            self.emit(DispatchRecord::ConnectionReady {
                connection_id: connection_id.clone(),
                at: chrono::Utc::now(),
            });
        }

        observation
    }

    fn emit(&self, record: DispatchRecord) {
        // No subscribers is fine
        let _ = self.records.send(record);
    }
}

/// The protocol event loop.
///
/// Register every sub-protocol with [`register`](Self::register), then drive
/// the loop with [`run`](Self::run) on a dedicated task.
pub struct Dispatcher {
    handler: EventHandler,
    action_tx: ActionSender,
    action_rx: mpsc::UnboundedReceiver<ActionEvent>,
    state_tx: StateSender,
    state_rx: mpsc::UnboundedReceiver<StateEvent>,
    protocols: Vec<ProtocolName>,
}

impl Dispatcher {
    pub fn new(policy: DecisionPolicy, observer: LifecycleObserver) -> Self {
        Self::with_record_capacity(policy, observer, DEFAULT_RECORD_CAPACITY)
    }

    pub fn with_record_capacity(
        policy: DecisionPolicy,
        observer: LifecycleObserver,
        capacity: usize,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = mpsc::unbounded_channel();
        let (records, _) = broadcast::channel(capacity.max(1));

        Self {
            handler: EventHandler {
                policy,
                observer,
                records,
                summary: DispatchSummary::default(),
            },
            action_tx,
            action_rx,
            state_tx,
            state_rx,
            protocols: Vec::new(),
        }
    }

    /// Become the consumer of a sub-protocol's action-events and state-events.
    pub fn register(&mut self, service: &dyn ProtocolService) -> Result<(), DispatchError> {
        let protocol = service.name().clone();

        service
            .register_action_event(self.action_tx.clone())
            .map_err(|source| DispatchError::Registration {
                protocol: protocol.clone(),
                source,
            })?;
        service
            .register_msg_event(self.state_tx.clone())
            .map_err(|source| DispatchError::Registration {
                protocol: protocol.clone(),
                source,
            })?;

        info!(protocol = %protocol, "Registered for protocol events");
        self.protocols.push(protocol);
        Ok(())
    }

    pub fn protocols(&self) -> &[ProtocolName] {
        &self.protocols
    }

    /// Observability feed of handled events.
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchRecord> {
        self.handler.records.subscribe()
    }

    pub fn registry(&self) -> Arc<dyn ConnectionRegistry> {
        self.handler.observer.registry()
    }

    /// Evaluate one action-event and invoke its decision.
    pub fn handle_action(&mut self, event: ActionEvent) -> Result<Verdict, DispatchError> {
        self.handler.handle_action(event)
    }

    /// Feed one state-event to the lifecycle observer.
    pub fn handle_state(&mut self, event: &StateEvent) -> Observation {
        self.handler.handle_state(event)
    }

    /// Run until shutdown is signalled, every event stream has closed, or a
    /// contract violation occurs.
    ///
    /// Shutdown is signalled by sending `true` on the watch channel or by
    /// dropping its sender. Events are taken from whichever stream has one
    /// ready first and are handled to completion before the next is taken.
    pub async fn run(
        self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<DispatchSummary, DispatchError> {
        let Self {
            mut handler,
            action_tx,
            mut action_rx,
            state_tx,
            mut state_rx,
            protocols,
        } = self;

        if protocols.is_empty() {
            return Err(DispatchError::NoProtocols);
        }

        // Only registered services keep the streams open from here on.
        drop(action_tx);
        drop(state_tx);

        info!(protocols = ?protocols, "Dispatcher started");

        let mut actions_open = true;
        let mut states_open = true;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                event = action_rx.recv(), if actions_open => match event {
                    Some(event) => {
                        handler.handle_action(event)?;
                    }
                    None => {
                        debug!("Action event stream closed");
                        actions_open = false;
                    }
                },
                event = state_rx.recv(), if states_open => match event {
                    Some(event) => {
                        handler.handle_state(&event);
                    }
                    None => {
                        debug!("State event stream closed");
                        states_open = false;
                    }
                },
            }

            if !actions_open && !states_open {
                warn!("All protocol event streams closed");
                break;
            }
        }

        let summary = handler.summary;
        info!(
            actions = summary.actions,
            states = summary.states,
            completed = summary.completed,
            "Dispatcher stopped"
        );
        Ok(summary)
    }
}

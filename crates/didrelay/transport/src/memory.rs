use crate::{ActionSender, ProtocolService, RegistrationError, StateSender, TransportError};
use didrelay_types::{
    ActionEvent, DidCommMsg, EventProperties, PendingAction, ProtocolName, StateEvent,
};
use std::sync::RwLock;
use tracing::{debug, trace};

/// In-process sub-protocol service.
///
/// Stands in for a framework client: whoever feeds the transport calls
/// [`deliver`](Self::deliver) and [`notify_state`](Self::notify_state), and
/// the registered consumers receive the events in call order.
pub struct InMemoryProtocolService {
    name: ProtocolName,
    action_channel: RwLock<Option<ActionSender>>,
    state_channels: RwLock<Vec<StateSender>>,
}

impl InMemoryProtocolService {
    pub fn new(name: ProtocolName) -> Self {
        Self {
            name,
            action_channel: RwLock::new(None),
            state_channels: RwLock::new(Vec::new()),
        }
    }

    /// Hand an inbound message to the action consumer and return the handle
    /// the decision arrives on.
    pub fn deliver(
        &self,
        message: DidCommMsg,
        properties: Option<EventProperties>,
    ) -> Result<PendingAction, TransportError> {
        let guard = self
            .action_channel
            .read()
            .map_err(|_| TransportError::LockError)?;
        let channel = guard
            .as_ref()
            .ok_or_else(|| TransportError::NoActionConsumer(self.name.clone()))?;

        let (event, pending) = ActionEvent::new(self.name.clone(), message, properties);
        trace!(
            protocol = %self.name,
            message_type = %pending.message_type,
            "Delivering action event"
        );
        channel
            .send(event)
            .map_err(|_| TransportError::ChannelClosed(self.name.clone()))?;

        Ok(pending)
    }

    /// Publish a state transition to every live state consumer. Returns the
    /// number of consumers reached.
    pub fn notify_state(
        &self,
        connection_id: &str,
        state_id: &str,
    ) -> Result<usize, TransportError> {
        self.publish_state(StateEvent::new(self.name.clone(), connection_id, state_id))
    }

    pub fn publish_state(&self, event: StateEvent) -> Result<usize, TransportError> {
        let mut channels = self
            .state_channels
            .write()
            .map_err(|_| TransportError::LockError)?;
        channels.retain(|channel| channel.send(event.clone()).is_ok());

        if channels.is_empty() {
            debug!(
                protocol = %self.name,
                state = %event.state_id,
                "No state consumer for transition"
            );
            return Err(TransportError::ChannelClosed(self.name.clone()));
        }
        Ok(channels.len())
    }
}

impl ProtocolService for InMemoryProtocolService {
    fn name(&self) -> &ProtocolName {
        &self.name
    }

    fn register_action_event(&self, channel: ActionSender) -> Result<(), RegistrationError> {
        let mut guard = self
            .action_channel
            .write()
            .map_err(|_| RegistrationError::LockError)?;
        if guard.as_ref().is_some_and(|existing| !existing.is_closed()) {
            return Err(RegistrationError::AlreadyRegistered(self.name.clone()));
        }
        *guard = Some(channel);
        debug!(protocol = %self.name, "Action event consumer registered");
        Ok(())
    }

    fn register_msg_event(&self, channel: StateSender) -> Result<(), RegistrationError> {
        let mut guard = self
            .state_channels
            .write()
            .map_err(|_| RegistrationError::LockError)?;
        guard.push(channel);
        debug!(protocol = %self.name, consumers = guard.len(), "State event consumer registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didrelay_types::{msg_types, ActionOutcome};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn request() -> DidCommMsg {
        DidCommMsg::new(json!({"@id": "1", "@type": msg_types::MEDIATE_REQUEST})).unwrap()
    }

    #[test]
    fn deliver_without_consumer_fails() {
        let service = InMemoryProtocolService::new(ProtocolName::mediator());
        let err = service.deliver(request(), None).expect_err("must fail");
        assert!(matches!(err, TransportError::NoActionConsumer(_)));
    }

    #[test]
    fn second_action_registration_is_rejected() {
        let service = InMemoryProtocolService::new(ProtocolName::mediator());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        service.register_action_event(tx1).expect("first registration");
        let err = service.register_action_event(tx2).expect_err("must reject");
        assert!(matches!(err, RegistrationError::AlreadyRegistered(_)));
    }

    #[test]
    fn closed_action_consumer_can_be_replaced() {
        let service = InMemoryProtocolService::new(ProtocolName::mediator());
        let (tx1, rx1) = mpsc::unbounded_channel();
        service.register_action_event(tx1).expect("first registration");
        drop(rx1);
        let (tx2, _rx2) = mpsc::unbounded_channel();
        service.register_action_event(tx2).expect("replacement");
    }

    #[tokio::test]
    async fn delivered_event_reaches_consumer_and_decision_returns() {
        let service = InMemoryProtocolService::new(ProtocolName::mediator());
        let (tx, mut rx) = mpsc::unbounded_channel();
        service.register_action_event(tx).unwrap();

        let pending = service.deliver(request(), None).unwrap();
        let event = rx.recv().await.expect("event");
        assert_eq!(event.protocol, ProtocolName::mediator());
        assert!(event.continue_with(None));

        assert_eq!(
            pending.outcome().await,
            Some(ActionOutcome::Continued { properties: None })
        );
    }

    #[test]
    fn deliver_to_dropped_consumer_fails() {
        let service = InMemoryProtocolService::new(ProtocolName::mediator());
        let (tx, rx) = mpsc::unbounded_channel();
        service.register_action_event(tx).unwrap();
        drop(rx);
        let err = service.deliver(request(), None).expect_err("must fail");
        assert!(matches!(err, TransportError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn state_events_fan_out_to_all_consumers() {
        let service = InMemoryProtocolService::new(ProtocolName::did_exchange());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        service.register_msg_event(tx1).unwrap();
        service.register_msg_event(tx2).unwrap();

        assert_eq!(service.notify_state("conn-1", "requested").unwrap(), 2);
        assert_eq!(rx1.recv().await.unwrap().state_id, "requested");
        assert_eq!(rx2.recv().await.unwrap().connection_id, "conn-1");
    }

    #[test]
    fn state_events_skip_closed_consumers() {
        let service = InMemoryProtocolService::new(ProtocolName::did_exchange());
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        service.register_msg_event(tx1).unwrap();
        service.register_msg_event(tx2).unwrap();
        drop(rx1);

        assert_eq!(service.notify_state("conn-1", "completed").unwrap(), 1);
    }
}

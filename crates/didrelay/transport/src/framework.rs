use crate::{InMemoryProtocolService, ProtocolService};
use didrelay_types::{FrameworkContext, ProtocolName};
use std::sync::Arc;
use tracing::info;

/// In-process framework: the shared context plus one service per
/// sub-protocol the router takes part in.
pub struct LoopbackFramework {
    context: Arc<FrameworkContext>,
    did_exchange: Arc<InMemoryProtocolService>,
    mediator: Arc<InMemoryProtocolService>,
}

impl LoopbackFramework {
    pub fn new(context: FrameworkContext) -> Self {
        info!(
            service_endpoint = %context.service_endpoint,
            profiles = ?context.media_type_profiles,
            "Framework context created"
        );
        Self {
            context: Arc::new(context),
            did_exchange: Arc::new(InMemoryProtocolService::new(ProtocolName::did_exchange())),
            mediator: Arc::new(InMemoryProtocolService::new(ProtocolName::mediator())),
        }
    }

    pub fn context(&self) -> Arc<FrameworkContext> {
        self.context.clone()
    }

    /// Connection-exchange service.
    pub fn did_exchange(&self) -> Arc<InMemoryProtocolService> {
        self.did_exchange.clone()
    }

    /// Mediator-registration service.
    pub fn mediator(&self) -> Arc<InMemoryProtocolService> {
        self.mediator.clone()
    }

    /// Every sub-protocol service, connection-exchange first.
    pub fn services(&self) -> Vec<Arc<dyn ProtocolService>> {
        vec![
            self.did_exchange.clone() as Arc<dyn ProtocolService>,
            self.mediator.clone() as Arc<dyn ProtocolService>,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_both_sub_protocols_in_order() {
        let framework = LoopbackFramework::new(FrameworkContext::new("ws://localhost:5001"));
        let names: Vec<_> = framework
            .services()
            .iter()
            .map(|s| s.name().clone())
            .collect();
        assert_eq!(names, vec![ProtocolName::did_exchange(), ProtocolName::mediator()]);
        assert_eq!(framework.context().service_endpoint, "ws://localhost:5001");
    }
}

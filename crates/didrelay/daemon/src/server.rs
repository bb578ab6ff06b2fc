//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use axum::Router;
use didrelay_dispatch::{DecisionPolicy, Dispatcher, LifecycleObserver};
use didrelay_oob::InvitationFactory;
use didrelay_transport::LoopbackFramework;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// didrelay router server
pub struct Server {
    config: DaemonConfig,
    framework: LoopbackFramework,
    dispatcher: Dispatcher,
    factory: Arc<InvitationFactory>,
}

impl Server {
    /// Build the framework and register the dispatcher with every
    /// sub-protocol. Any registration failure aborts startup.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let framework = LoopbackFramework::new(config.framework.context());

        let policy = DecisionPolicy::for_role(config.dispatcher.role);
        let mut dispatcher = Dispatcher::with_record_capacity(
            policy,
            LifecycleObserver::in_memory(),
            config.dispatcher.record_buffer,
        );

        for service in framework.services() {
            dispatcher
                .register(service.as_ref())
                .map_err(|e| DaemonError::Startup(e.to_string()))?;
        }

        let factory = Arc::new(InvitationFactory::new(framework.context()));

        Ok(Self {
            config,
            framework,
            dispatcher,
            factory,
        })
    }

    /// The framework the dispatcher is registered with.
    pub fn framework(&self) -> &LoopbackFramework {
        &self.framework
    }

    /// HTTP router over this server's state.
    pub fn router(&self) -> Router {
        let state = AppState::new(
            self.factory.clone(),
            self.dispatcher.registry(),
            self.config.invitation.clone(),
        );
        create_router(state, self.config.server.enable_cors)
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        let Self {
            config,
            framework,
            dispatcher,
            ..
        } = self;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut dispatcher_task = tokio::spawn(dispatcher.run(shutdown_rx));

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("didrelay listening on {}", addr);
        tracing::info!(
            role = %config.dispatcher.role,
            service_endpoint = %config.framework.service_endpoint,
            "Router ready"
        );

        let serve = async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        };

        tokio::select! {
            served = serve => {
                served.map_err(|e| DaemonError::Server(e.to_string()))?;
            }
            finished = &mut dispatcher_task => {
                // The loop only ends on its own when it has failed or lost
                // every event stream.
                let summary = finished.map_err(|e| DaemonError::Server(e.to_string()))??;
                tracing::error!(actions = summary.actions, "Dispatcher stopped unexpectedly");
                return Err(DaemonError::Server("dispatcher stopped".to_string()));
            }
        }

        tracing::info!("didrelay shutting down");

        // Stop dispatcher
        let _ = shutdown_tx.send(true);
        let summary = dispatcher_task
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))??;
        tracing::info!(
            actions = summary.actions,
            states = summary.states,
            completed = summary.completed,
            "Dispatcher drained"
        );

        drop(framework);
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

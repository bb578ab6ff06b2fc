//! Application state for API handlers

use crate::config::InvitationConfig;
use didrelay_dispatch::ConnectionRegistry;
use didrelay_oob::InvitationFactory;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Invitation factory over the framework context
    pub factory: Arc<InvitationFactory>,

    /// Connections observed by the dispatcher
    pub registry: Arc<dyn ConnectionRegistry>,

    /// Per-request invitation defaults
    pub invitation: InvitationConfig,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        factory: Arc<InvitationFactory>,
        registry: Arc<dyn ConnectionRegistry>,
        invitation: InvitationConfig,
    ) -> Self {
        Self {
            factory,
            registry,
            invitation,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        format_uptime(duration.num_seconds())
    }
}

fn format_uptime(secs: i64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_format() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(7260), "2h 1m");
        assert_eq!(format_uptime(90000), "1d 1h");
    }
}

//! Configuration for didrelayd

use didrelay_dispatch::ProtocolRole;
use didrelay_types::{FrameworkContext, DIDCOMM_V2_PROFILE};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Framework the router runs on
    #[serde(default)]
    pub framework: FrameworkConfig,

    /// Defaults for created invitations
    #[serde(default)]
    pub invitation: InvitationConfig,

    /// Dispatcher configuration
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Framework configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Endpoint advertised to peers in invitations
    #[serde(default = "default_service_endpoint")]
    pub service_endpoint: String,

    /// Media-type profiles, in preference order
    #[serde(default = "default_media_type_profiles")]
    pub media_type_profiles: Vec<String>,

    /// DID presented as the invitation sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_did: Option<String>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            service_endpoint: default_service_endpoint(),
            media_type_profiles: default_media_type_profiles(),
            sender_did: None,
        }
    }
}

impl FrameworkConfig {
    pub fn context(&self) -> FrameworkContext {
        let context = FrameworkContext::new(self.service_endpoint.clone())
            .with_media_type_profiles(self.media_type_profiles.clone());
        match &self.sender_did {
            Some(did) => context.with_sender_did(did.clone()),
            None => context,
        }
    }
}

/// Invitation defaults, each overridable per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    /// Label shown to the invited peer
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Attach a mediation request to every invitation
    #[serde(default = "default_true")]
    pub embed_mediation_request: bool,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            goal_code: None,
            goal: None,
            embed_mediation_request: true,
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Role feeding the decision policy
    #[serde(default)]
    pub role: ProtocolRole,

    /// Capacity of the dispatch record feed
    #[serde(default = "default_record_buffer")]
    pub record_buffer: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            role: ProtocolRole::default(),
            record_buffer: default_record_buffer(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 5000))
}

fn default_service_endpoint() -> String {
    "ws://localhost:5001".to_string()
}

fn default_media_type_profiles() -> Vec<String> {
    vec![DIDCOMM_V2_PROFILE.to_string()]
}

fn default_label() -> String {
    "Router".to_string()
}

fn default_record_buffer() -> usize {
    didrelay_dispatch::DEFAULT_RECORD_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Environment variables use the `DIDRELAY_` prefix and `__` between
    /// nesting levels, e.g. `DIDRELAY_SERVER__LISTEN_ADDR`. Profile lists are
    /// comma-separated.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DIDRELAY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("framework.media_type_profiles")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

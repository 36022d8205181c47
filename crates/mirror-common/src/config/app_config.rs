//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// Main mirror configuration
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Access token presented to the remote service during Identify
    pub token: String,
    /// Source server identifier; events from other servers are ignored
    pub server_id: String,
    /// Channel-to-webhook routing table
    pub routes: ChannelRoutes,
    /// Gateway endpoint settings
    pub gateway: GatewayConfig,
}

/// Gateway endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway URL including protocol version and encoding query parameters
    #[serde(default = "default_gateway_url")]
    pub url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
        }
    }
}

/// Immutable mapping from source channel id to destination webhook URL
///
/// Membership tests are O(1); the set is fixed for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct ChannelRoutes {
    routes: HashMap<String, String>,
}

impl ChannelRoutes {
    /// Create an empty route table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route, replacing any previous destination for the channel
    pub fn insert(&mut self, channel_id: impl Into<String>, webhook_url: impl Into<String>) {
        self.routes.insert(channel_id.into(), webhook_url.into());
    }

    /// Look up the destination webhook URL for a channel
    #[must_use]
    pub fn destination(&self, channel_id: &str) -> Option<&str> {
        self.routes.get(channel_id).map(String::as_str)
    }

    /// Check whether a channel is routed
    #[must_use]
    pub fn contains(&self, channel_id: &str) -> bool {
        self.routes.contains_key(channel_id)
    }

    /// Number of configured routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<(String, String)> for ChannelRoutes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

/// Parse one `channelId,webhookUrl` route slot value
fn parse_route(slot: &'static str, value: &str) -> Result<(String, String), ConfigError> {
    let (channel_id, webhook_url) = value
        .split_once(',')
        .ok_or_else(|| ConfigError::InvalidValue(slot, value.to_string()))?;

    let channel_id = channel_id.trim();
    let webhook_url = webhook_url.trim();

    if channel_id.is_empty() || webhook_url.is_empty() {
        return Err(ConfigError::InvalidValue(slot, value.to_string()));
    }

    Ok((channel_id.to_string(), webhook_url.to_string()))
}

/// Name of the numbered route slot, e.g. `CH1`
///
/// Leaked allocations are bounded by the number of configured slots, read
/// once at startup.
fn slot_name(index: usize) -> &'static str {
    Box::leak(format!("CH{index}").into_boxed_str())
}

impl MirrorConfig {
    /// Load configuration from environment variables
    ///
    /// Route slots are read from `CH1`, `CH2`, ... until the first missing
    /// slot; at least one route must be configured.
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or a
    /// route slot is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let token =
            env::var("DISCORD_TOKEN").map_err(|_| ConfigError::MissingVar("DISCORD_TOKEN"))?;
        let server_id = env::var("SERVER_ID").map_err(|_| ConfigError::MissingVar("SERVER_ID"))?;

        let mut routes = ChannelRoutes::new();
        for index in 1.. {
            let slot = slot_name(index);
            match env::var(slot) {
                Ok(value) => {
                    let (channel_id, webhook_url) = parse_route(slot, &value)?;
                    routes.insert(channel_id, webhook_url);
                }
                Err(_) => break,
            }
        }

        if routes.is_empty() {
            return Err(ConfigError::MissingVar("CH1"));
        }

        Ok(Self {
            token,
            server_id,
            routes,
            gateway: GatewayConfig {
                url: env::var("GATEWAY_URL").unwrap_or_else(|_| default_gateway_url()),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

//! Configuration structs

mod app_config;

pub use app_config::{ChannelRoutes, ConfigError, GatewayConfig, MirrorConfig};

//! # mirror-gateway
//!
//! Persistent gateway session: transport, protocol state machine, liveness
//! monitoring, and reconnection.

pub mod client;
pub mod handlers;
pub mod heartbeat;
pub mod protocol;
pub mod session;
pub mod supervisor;
pub mod transport;

use mirror_common::MirrorConfig;
use mirror_relay::{EventRouter, WebhookClient};
use std::sync::Arc;

/// Run the mirror against the gateway until the process is stopped
///
/// Wires the webhook delivery sink and the event router, then hands control
/// to the reconnection supervisor. Never returns.
pub async fn run(config: MirrorConfig) {
    let http = reqwest::Client::new();
    let sink = Arc::new(WebhookClient::new(http));
    let router = EventRouter::new(config.server_id.clone(), config.routes.clone(), sink);

    supervisor::run(&config, &router).await;
}

//! Reconnection supervisor
//!
//! Keeps a gateway session alive for the lifetime of the process. Every
//! close — clean, errored, or a failed connect — schedules a fresh attempt
//! after a fixed delay. There is no retry limit.

use crate::client;
use mirror_common::MirrorConfig;
use mirror_relay::EventRouter;
use std::time::Duration;

/// Fixed delay between reconnect attempts (5 s)
const RECONNECT_DELAY: Duration = Duration::from_millis(5_000);

/// Run the gateway connection loop, forever
///
/// Each pass builds a brand-new transport and session; nothing survives
/// from one attempt to the next.
pub async fn run(config: &MirrorConfig, router: &EventRouter) {
    loop {
        match client::run_session(&config.gateway.url, &config.token, router).await {
            Ok(reason) => {
                tracing::info!(reason = %reason, "Gateway connection closed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open gateway connection");
            }
        }

        tracing::info!(
            delay_ms = RECONNECT_DELAY.as_millis(),
            "Reconnecting after delay"
        );
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

//! Liveness monitor
//!
//! Sends Heartbeat envelopes at the server-dictated cadence and watches
//! acknowledgement recency for a silently dead connection.

use crate::protocol::Envelope;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// How stale an acknowledgement may get before the connection is reported
/// unresponsive (15 s)
const STALENESS_THRESHOLD: Duration = Duration::from_millis(15_000);

/// Spawn the recurring heartbeat task for a session
///
/// Each tick sends a Heartbeat carrying the last-known sequence, then checks
/// acknowledgement staleness. Staleness is logged, not acted on: the remote
/// service closes dead connections itself, which feeds the normal
/// close/reconnect path. The caller owns the handle and must abort it when
/// the session closes.
pub fn spawn(session: Arc<Session>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; the first beat
        // must wait a full period.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let sequence = session.sequence().await;
            if session.send(Envelope::heartbeat(sequence)).await.is_err() {
                // Receiver gone: the session is being torn down.
                tracing::debug!(
                    session_id = %session.id(),
                    "Heartbeat channel closed; stopping liveness monitor"
                );
                return;
            }

            tracing::trace!(
                session_id = %session.id(),
                sequence = ?sequence,
                "Heartbeat sent"
            );

            if let Some(age) = session.last_ack_age().await {
                if age > STALENESS_THRESHOLD {
                    tracing::warn!(
                        session_id = %session.id(),
                        age_ms = age.as_millis(),
                        "Gateway connection is unresponsive"
                    );
                }
            }
        }
    })
}

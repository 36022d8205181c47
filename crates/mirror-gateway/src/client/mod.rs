//! Per-session gateway client loop
//!
//! Drives one session: pumps inbound frames through the envelope dispatcher
//! and writes outbound envelopes (Identify, heartbeats) to the transport.
//! Frames are processed one at a time in arrival order; the session's only
//! other task is the liveness monitor, which shares state through the
//! session's locks.

use crate::handlers::EnvelopeDispatcher;
use crate::protocol::Envelope;
use crate::session::{Session, SessionState};
use crate::transport::{self, CloseReason, GatewayStream, TransportError};
use futures_util::{SinkExt, StreamExt};
use mirror_relay::EventRouter;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Buffer size for outbound envelopes
const ENVELOPE_BUFFER_SIZE: usize = 100;

/// Run one session against the gateway until its transport closes
///
/// Returns the close reason once the connection ends; connection-open
/// failures surface as `TransportError`. Either way the caller (the
/// supervisor) schedules the next attempt.
pub async fn run_session(
    url: &str,
    token: &str,
    router: &EventRouter,
) -> Result<CloseReason, TransportError> {
    let mut stream = transport::connect(url).await?;

    let (tx, mut rx) = mpsc::channel::<Envelope>(ENVELOPE_BUFFER_SIZE);
    let session = Session::new(tx);
    session.set_state(SessionState::AwaitingHello).await;

    tracing::info!(session_id = %session.id(), "Connected to the gateway");

    let reason = drive(&mut stream, &session, token, router, &mut rx).await;

    // The heartbeat timer must be dead before the supervisor can schedule a
    // reconnect; a stale timer acting on a superseded session is forbidden.
    session.abort_heartbeat().await;
    session.set_state(SessionState::Closed).await;

    tracing::info!(
        session_id = %session.id(),
        reason = %reason,
        uptime_ms = session.age().as_millis(),
        "Session closed"
    );

    Ok(reason)
}

/// Pump frames and outbound envelopes until the connection ends
async fn drive(
    stream: &mut GatewayStream,
    session: &std::sync::Arc<Session>,
    token: &str,
    router: &EventRouter,
    rx: &mut mpsc::Receiver<Envelope>,
) -> CloseReason {
    loop {
        tokio::select! {
            outbound = rx.recv() => {
                let Some(envelope) = outbound else {
                    // All senders dropped; nothing can be written anymore.
                    return CloseReason::Normal;
                };
                let json = match envelope.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::warn!(
                            session_id = %session.id(),
                            error = %e,
                            "Failed to encode outbound envelope; dropping"
                        );
                        continue;
                    }
                };
                if let Err(e) = stream.send(Message::Text(json)).await {
                    tracing::warn!(
                        session_id = %session.id(),
                        error = %e,
                        "Failed to send frame"
                    );
                    return CloseReason::Error;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        EnvelopeDispatcher::dispatch(session, token, router, &text).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if stream.send(Message::Pong(data)).await.is_err() {
                            return CloseReason::Error;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(
                            session_id = %session.id(),
                            frame = ?frame,
                            "Server closed the connection"
                        );
                        return CloseReason::Normal;
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames are ignored
                    }
                    Some(Err(e)) => {
                        tracing::warn!(
                            session_id = %session.id(),
                            error = %e,
                            "WebSocket error"
                        );
                        return CloseReason::Error;
                    }
                    None => return CloseReason::RemoteReset,
                }
            }
        }
    }
}

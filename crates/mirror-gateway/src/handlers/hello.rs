//! Hello handler (op 10)

use super::{HandlerError, HandlerResult};
use crate::heartbeat;
use crate::protocol::{Envelope, IdentifyPayload};
use crate::session::{Session, SessionState};
use std::sync::Arc;
use std::time::Duration;

/// Handles Hello envelopes
pub struct HelloHandler;

impl HelloHandler {
    /// Handle a Hello from the server
    ///
    /// Arms the liveness monitor at the server-dictated interval and sends
    /// Identify. The server may legitimately resend Hello; a duplicate
    /// re-arms the timer but never triggers a second Identify.
    pub async fn handle(
        session: &Arc<Session>,
        token: &str,
        envelope: &Envelope,
    ) -> HandlerResult<()> {
        let payload = envelope.as_hello().ok_or_else(|| {
            HandlerError::InvalidPayload("Hello payload missing heartbeat_interval".to_string())
        })?;

        let period = Duration::from_millis(payload.heartbeat_interval);
        session
            .arm_heartbeat(heartbeat::spawn(session.clone(), period))
            .await;

        tracing::debug!(
            session_id = %session.id(),
            interval_ms = payload.heartbeat_interval,
            "Liveness monitor armed"
        );

        if session.is_authenticated().await {
            tracing::debug!(
                session_id = %session.id(),
                "Duplicate Hello; Identify already sent"
            );
            return Ok(());
        }

        session.mark_authenticated().await;
        session
            .send(Envelope::identify(&IdentifyPayload::new(token)))
            .await
            .map_err(|e| HandlerError::SessionClosed(e.to_string()))?;
        session.set_state(SessionState::Identifying).await;

        tracing::info!(session_id = %session.id(), "Identify sent");

        Ok(())
    }
}

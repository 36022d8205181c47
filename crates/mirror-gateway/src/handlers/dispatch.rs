//! Dispatch handler (op 0)

use super::{HandlerError, HandlerResult};
use crate::protocol::Envelope;
use crate::session::{Session, SessionState};
use mirror_relay::EventRouter;
use serde_json::Value;
use std::sync::Arc;

/// Handles Dispatch envelopes
pub struct DispatchHandler;

impl DispatchHandler {
    /// Handle an application event from the server
    ///
    /// Records the sequence number, then forwards the event to the router
    /// once the session is authenticated. A Dispatch arriving before the
    /// first acknowledgement also confirms the session is live.
    pub async fn handle(
        session: &Arc<Session>,
        router: &EventRouter,
        envelope: &Envelope,
    ) -> HandlerResult<()> {
        if let Some(sequence) = envelope.s {
            session.record_sequence(sequence).await;
        }

        if !session.is_authenticated().await {
            tracing::debug!(
                session_id = %session.id(),
                "Dispatch before Identify; ignoring"
            );
            return Ok(());
        }

        if session.state().await == SessionState::Identifying {
            session.set_state(SessionState::Ready).await;
            tracing::info!(
                session_id = %session.id(),
                "Session ready (first event arrived before first ack)"
            );
        }

        let Some(event_type) = envelope.event_type() else {
            return Err(HandlerError::InvalidPayload(
                "Dispatch envelope missing event type".to_string(),
            ));
        };

        let payload = envelope.d.clone().unwrap_or(Value::Null);
        router.route(event_type, envelope.s, &payload).await;

        Ok(())
    }
}

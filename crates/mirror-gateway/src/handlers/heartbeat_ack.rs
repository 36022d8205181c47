//! Heartbeat ACK handler (op 11)

use super::HandlerResult;
use crate::session::{Session, SessionState};
use std::sync::Arc;

/// Handles heartbeat acknowledgements
pub struct HeartbeatAckHandler;

impl HeartbeatAckHandler {
    /// Handle a heartbeat acknowledgement from the server
    ///
    /// Records acknowledgement recency in every state. The first
    /// acknowledgement after Identify confirms the session is live.
    pub async fn handle(session: &Arc<Session>) -> HandlerResult<()> {
        session.record_heartbeat_ack().await;

        if session.state().await == SessionState::Identifying {
            session.set_state(SessionState::Ready).await;
            tracing::info!(session_id = %session.id(), "Session ready");
        }

        tracing::trace!(session_id = %session.id(), "Heartbeat acknowledged");

        Ok(())
    }
}

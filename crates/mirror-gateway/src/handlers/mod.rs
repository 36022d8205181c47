//! Op code handlers
//!
//! Handles incoming gateway envelopes based on their operation code.

mod dispatch;
mod error;
mod heartbeat_ack;
mod hello;

pub use dispatch::DispatchHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat_ack::HeartbeatAckHandler;
pub use hello::HelloHandler;

use crate::protocol::{Envelope, OpCode};
use crate::session::Session;
use mirror_relay::EventRouter;
use std::sync::Arc;

/// Dispatch incoming server envelopes to the appropriate handlers
pub struct EnvelopeDispatcher;

impl EnvelopeDispatcher {
    /// Handle one raw text frame from the gateway
    ///
    /// A frame that fails to decode is logged and dropped; it never closes
    /// the session. Unrecognized op codes are a forward-compatible no-op.
    pub async fn dispatch(session: &Arc<Session>, token: &str, router: &EventRouter, text: &str) {
        let envelope = match Envelope::from_json(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Failed to decode envelope; dropping frame"
                );
                return;
            }
        };

        tracing::trace!(
            session_id = %session.id(),
            op = %envelope.op,
            "Received envelope"
        );

        let result = match envelope.op {
            OpCode::Hello => HelloHandler::handle(session, token, &envelope).await,
            OpCode::HeartbeatAck => HeartbeatAckHandler::handle(session).await,
            OpCode::Dispatch => DispatchHandler::handle(session, router, &envelope).await,
            OpCode::Heartbeat | OpCode::Identify | OpCode::Other(_) => {
                tracing::trace!(
                    session_id = %session.id(),
                    op = %envelope.op,
                    "Ignoring unhandled op code"
                );
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(
                session_id = %session.id(),
                op = %envelope.op,
                error = %e,
                "Handler error"
            );
        }
    }
}

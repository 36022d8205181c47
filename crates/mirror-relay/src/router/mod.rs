//! Event routing
//!
//! Filters Dispatch events down to message creation in monitored channels
//! and hands normalized messages to the delivery sink.

use crate::delivery::MessageSink;
use crate::events::{EventType, MessageCreateEvent};
use crate::normalize;
use mirror_common::config::ChannelRoutes;
use serde_json::Value;
use std::sync::Arc;

/// Routes qualifying Dispatch events to the delivery sink
///
/// An event qualifies iff it is a MESSAGE_CREATE, its guild matches the
/// configured server, and its channel has a configured destination.
/// Everything else produces nothing.
pub struct EventRouter {
    server_id: String,
    routes: ChannelRoutes,
    sink: Arc<dyn MessageSink>,
}

impl EventRouter {
    /// Create a router for one server and its route table
    #[must_use]
    pub fn new(
        server_id: impl Into<String>,
        routes: ChannelRoutes,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            routes,
            sink,
        }
    }

    /// Route one Dispatch event
    ///
    /// Delivery failures are the sink's to log; routing itself never fails.
    /// Malformed payloads are logged and dropped.
    pub async fn route(&self, event_type: &str, sequence: Option<u64>, payload: &Value) {
        if EventType::parse(event_type) != Some(EventType::MessageCreate) {
            tracing::trace!(event_type, "Ignoring out-of-scope event");
            return;
        }

        let event: MessageCreateEvent = match serde_json::from_value(payload.clone()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed MESSAGE_CREATE payload");
                return;
            }
        };

        if event.guild_id.as_deref() != Some(self.server_id.as_str()) {
            tracing::trace!(
                guild_id = ?event.guild_id,
                "Ignoring message from unmonitored server"
            );
            return;
        }

        let Some(destination) = self.routes.destination(&event.channel_id) else {
            tracing::trace!(
                channel_id = %event.channel_id,
                "Ignoring message from unrouted channel"
            );
            return;
        };

        let message = normalize::normalize(&event, destination);

        tracing::debug!(
            channel_id = %event.channel_id,
            sequence = ?sequence,
            username = %message.username,
            "Mirroring message"
        );

        self.sink.deliver(message).await;
    }
}

//! # mirror-relay
//!
//! Decides which gateway events to mirror, normalizes them, and delivers
//! them to webhook destinations.

pub mod channels;
pub mod delivery;
pub mod events;
pub mod normalize;
pub mod router;

pub use delivery::{DeliveryError, MessageSink, WebhookClient};
pub use events::{AuthorPayload, EventType, MessageCreateEvent};
pub use normalize::NormalizedMessage;
pub use router::EventRouter;

//! Gateway event types and payloads

mod event_types;
mod payloads;

pub use event_types::EventType;
pub use payloads::{AttachmentPayload, AuthorPayload, MessageCreateEvent, StickerItemPayload};

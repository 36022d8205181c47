//! Event payload definitions
//!
//! Data structures for the Dispatch events the mirror consumes. Ids stay as
//! strings: the remote service serializes them that way, and they exceed the
//! precision of a 64-bit float.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub id: String,
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub author: AuthorPayload,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
    #[serde(default)]
    pub embeds: Vec<Value>,
    /// Present (possibly empty) only on sticker messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker_items: Option<Vec<StickerItemPayload>>,
}

/// Message author data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPayload {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Attachment data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub url: String,
    pub size: u64,
}

/// Sticker reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickerItemPayload {
    pub id: String,
}

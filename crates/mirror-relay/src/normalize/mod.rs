//! Message normalization
//!
//! Turns a MESSAGE_CREATE event into the outbound record consumed by the
//! delivery collaborator: display name, avatar URL, content, and media.

use crate::events::{AuthorPayload, MessageCreateEvent};
use serde_json::Value;

/// CDN base for user avatars
const AVATAR_CDN_BASE: &str = "https://cdn.discordapp.com/avatars";

/// CDN base for default avatars
const DEFAULT_AVATAR_CDN_BASE: &str = "https://cdn.discordapp.com/embed/avatars";

/// Media base for sticker images
const STICKER_MEDIA_BASE: &str = "https://media.discordapp.net/stickers";

/// Placeholder for messages with no text content
const EMPTY_CONTENT_PLACEHOLDER: &str = "** **\n";

/// Attachments at or above this size are linked instead of attached (8 MiB)
const ATTACHMENT_SIZE_LIMIT: u64 = 8 * 1024 * 1024;

/// The outbound record handed to the delivery collaborator
///
/// Constructed once per qualifying event and consumed immediately; never
/// persisted.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    /// Display name: username, discriminator suffix, and role tag
    pub username: String,
    /// Resolved avatar CDN URL
    pub avatar_url: String,
    /// Message text (placeholder if empty, possibly with appended links)
    pub content: String,
    /// Media file URLs, when media is attached as files
    pub files: Option<Vec<String>>,
    /// Embeds passed through as-is
    pub embeds: Option<Value>,
    /// Destination webhook URL
    pub destination_url: String,
}

/// Build the display name for an author
///
/// The discriminator sentinel `"0"` means the account has no discriminator
/// and the suffix is omitted.
#[must_use]
pub fn display_name(author: &AuthorPayload) -> String {
    let discriminator = if author.discriminator == "0" {
        String::new()
    } else {
        format!("#{}", author.discriminator)
    };
    let tag = if author.bot { " [BOT]" } else { " [USER]" };

    format!("{}{discriminator}{tag}", author.username)
}

/// Resolve the avatar CDN URL for an author
///
/// Animated avatars (hash prefixed `a_`) get the `gif` extension, static
/// ones `jpg`. Authors without a custom avatar fall back to a default
/// avatar indexed by their id.
#[must_use]
pub fn avatar_url(author: &AuthorPayload) -> String {
    match &author.avatar {
        Some(hash) => {
            let ext = if hash.starts_with("a_") { "gif" } else { "jpg" };
            format!("{AVATAR_CDN_BASE}/{}/{hash}.{ext}", author.id)
        }
        None => format!(
            "{DEFAULT_AVATAR_CDN_BASE}/{}.png",
            default_avatar_index(&author.id)
        ),
    }
}

/// Default-avatar index: `(id >> 22) % 6`
///
/// Author ids exceed 64-bit float precision, so the shift is done on a
/// 128-bit integer. An unparseable id maps to index 0.
fn default_avatar_index(id: &str) -> u128 {
    id.parse::<u128>().map_or(0, |id| (id >> 22) % 6)
}

/// Build the sticker media URL for a sticker id
fn sticker_url(sticker_id: &str) -> String {
    format!("{STICKER_MEDIA_BASE}/{sticker_id}.webp")
}

/// Normalize a MESSAGE_CREATE event for delivery to `destination_url`
///
/// Media precedence, first match wins: embeds, then sticker items, then
/// attachments. Attachments whose largest member reaches 8 MiB are appended
/// to the content as a newline-joined URL list instead of attached.
#[must_use]
pub fn normalize(event: &MessageCreateEvent, destination_url: &str) -> NormalizedMessage {
    let mut content = if event.content.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER.to_string()
    } else {
        event.content.clone()
    };

    let mut files = None;
    let mut embeds = None;

    if !event.embeds.is_empty() {
        embeds = Some(Value::Array(event.embeds.clone()));
    } else if let Some(sticker_items) = &event.sticker_items {
        files = Some(
            sticker_items
                .iter()
                .map(|sticker| sticker_url(&sticker.id))
                .collect(),
        );
    } else if !event.attachments.is_empty() {
        let largest = event
            .attachments
            .iter()
            .map(|attachment| attachment.size)
            .max()
            .unwrap_or(0);

        let urls: Vec<String> = event
            .attachments
            .iter()
            .map(|attachment| attachment.url.clone())
            .collect();

        if largest < ATTACHMENT_SIZE_LIMIT {
            files = Some(urls);
        } else {
            content.push_str(&urls.join("\n"));
        }
    }

    NormalizedMessage {
        username: display_name(&event.author),
        avatar_url: avatar_url(&event.author),
        content,
        files,
        embeds,
        destination_url: destination_url.to_string(),
    }
}

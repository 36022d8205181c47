//! Handshake payload definitions

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Payload for op 2 (Identify)
///
/// Sent by the client to authenticate the session, at most once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Access token
    pub token: String,

    /// Client properties
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    /// Create an Identify payload with the mirror's fixed client identity
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            properties: IdentifyProperties::mirror(),
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,

    /// Client name
    pub browser: String,

    /// Device type
    pub device: String,
}

impl IdentifyProperties {
    /// The mirror's fixed client identity
    #[must_use]
    pub fn mirror() -> Self {
        Self {
            os: "linux".to_string(),
            browser: "mirror".to_string(),
            device: "mirror".to_string(),
        }
    }
}

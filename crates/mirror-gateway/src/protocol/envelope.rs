//! Gateway envelope format
//!
//! All messages exchanged over the gateway connection follow this shape.

use super::{HelloPayload, IdentifyPayload, OpCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One gateway protocol message
///
/// Constructed per frame and not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl Envelope {
    // === Client Messages ===

    /// Create a Heartbeat message (op=1) carrying the last-known sequence
    ///
    /// The data field is an explicit null when no sequence has been seen.
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: Some(last_sequence.map_or(Value::Null, |s| Value::Number(s.into()))),
        }
    }

    /// Create an Identify message (op=2)
    #[must_use]
    pub fn identify(payload: &IdentifyPayload) -> Self {
        Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    // === Parsing Server Messages ===

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Get the Dispatch event type (op=0)
    pub fn event_type(&self) -> Option<&str> {
        if self.op != OpCode::Dispatch {
            return None;
        }
        self.t.as_deref()
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "Envelope(op={}, t={t}", self.op)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "Envelope(op={})", self.op)
        }
    }
}

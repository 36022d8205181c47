//! Gateway operation codes
//!
//! Defines the gateway op codes this client understands. The remote service
//! may add op codes at any time, so decoding is total: anything unknown maps
//! to `Other` and is treated as a no-op downstream.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Server dispatches an application event (server only)
    Dispatch,
    /// Heartbeat - keep connection alive (client/server)
    Heartbeat,
    /// Identify - authenticate session (client only)
    Identify,
    /// Hello - sent on connect, carries the heartbeat interval (server only)
    Hello,
    /// Heartbeat ACK - heartbeat acknowledged (server only)
    HeartbeatAck,
    /// Any op code this client does not understand (forward-compatible no-op)
    Other(u8),
}

impl OpCode {
    /// Create an `OpCode` from a raw integer value
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => Self::Other(other),
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Dispatch => 0,
            Self::Heartbeat => 1,
            Self::Identify => 2,
            Self::Hello => 10,
            Self::HeartbeatAck => 11,
            Self::Other(other) => other,
        }
    }

    /// Check if this op code is one the client recognizes
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Get the name of this op code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Identify => "Identify",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
            Self::Other(_) => "Other",
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Ok(Self::from_u8(value))
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}

//! Session state machine states

use serde::{Deserialize, Serialize};

/// Protocol session state
///
/// `Connecting → AwaitingHello → Identifying → Ready`, with `Closed`
/// reachable from anywhere on transport closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Transport connect in flight
    Connecting,
    /// Transport open, waiting for the server's Hello
    AwaitingHello,
    /// Identify sent, waiting for the first acknowledgement
    Identifying,
    /// Handshake complete, Dispatch events flow
    Ready,
    /// Transport closed; the session is defunct
    Closed,
}

impl SessionState {
    /// Check if the session has completed the handshake
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Check if the session is defunct
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Connecting => "Connecting",
            Self::AwaitingHello => "AwaitingHello",
            Self::Identifying => "Identifying",
            Self::Ready => "Ready",
            Self::Closed => "Closed",
        };
        write!(f, "{name}")
    }
}

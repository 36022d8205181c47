//! Session transport
//!
//! Opens the outbound WebSocket connection to the gateway. Frames arrive in
//! order, exactly once; closure surfaces exactly once with a reason. Retry
//! policy lives in the supervisor, never here.

use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

/// The duplex gateway stream
pub type GatewayStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport-level errors
///
/// Always recovered by the reconnection supervisor; never surfaced to a
/// caller outside the gateway core.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be opened
    #[error("Failed to open gateway connection: {0}")]
    Connect(#[from] tungstenite::Error),
}

/// Why a transport closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The remote side sent a close frame
    Normal,
    /// A read or write failed
    Error,
    /// The stream ended without a close frame
    RemoteReset,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Error => "error",
            Self::RemoteReset => "remote-reset",
        };
        write!(f, "{name}")
    }
}

/// Open a gateway connection
///
/// # Errors
/// Returns an error if the TCP connect, TLS handshake, or WebSocket upgrade
/// fails
pub async fn connect(url: &str) -> Result<GatewayStream, TransportError> {
    let (stream, response) = connect_async(url).await?;

    tracing::debug!(status = %response.status(), "Gateway connection opened");

    Ok(stream)
}

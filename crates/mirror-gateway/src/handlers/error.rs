//! Handler error types

use thiserror::Error;

/// Handler error type
///
/// Handler failures are logged by the dispatcher; none of them close the
/// session.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The envelope payload did not match its op code
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The session's transport writer is gone
    #[error("Session transport closed: {0}")]
    SessionClosed(String),
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

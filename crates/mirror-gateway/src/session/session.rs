//! Individual gateway session
//!
//! One session per transport connection. A session is never reused: the
//! reconnection supervisor builds a fresh one for every connection attempt,
//! so no state leaks across connections.

use super::SessionState;
use crate::protocol::Envelope;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

/// A single gateway session and its derived state
pub struct Session {
    /// Locally generated session ID for log correlation
    id: String,

    /// Current handshake state
    state: RwLock<SessionState>,

    /// Whether Identify has been sent on this session
    authenticated: RwLock<bool>,

    /// Last sequence number seen on a Dispatch envelope
    sequence: RwLock<Option<u64>>,

    /// When the last heartbeat acknowledgement arrived
    last_heartbeat_ack: RwLock<Option<Instant>>,

    /// Handle of the liveness monitor task, once armed
    heartbeat_task: Mutex<Option<JoinHandle<()>>>,

    /// Channel to send envelopes to the transport writer
    sender: mpsc::Sender<Envelope>,

    /// Session creation time
    created_at: Instant,
}

impl Session {
    /// Create a new session in the `Connecting` state
    pub fn new(sender: mpsc::Sender<Envelope>) -> Arc<Self> {
        Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: RwLock::new(SessionState::Connecting),
            authenticated: RwLock::new(false),
            sequence: RwLock::new(None),
            last_heartbeat_ack: RwLock::new(None),
            heartbeat_task: Mutex::new(None),
            sender,
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the current state
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Set the session state
    pub async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Check whether Identify has been sent on this session
    pub async fn is_authenticated(&self) -> bool {
        *self.authenticated.read().await
    }

    /// Record that Identify has been sent
    pub async fn mark_authenticated(&self) {
        *self.authenticated.write().await = true;
    }

    /// Get the last sequence number seen
    pub async fn sequence(&self) -> Option<u64> {
        *self.sequence.read().await
    }

    /// Record a sequence number from a Dispatch envelope
    pub async fn record_sequence(&self, sequence: u64) {
        *self.sequence.write().await = Some(sequence);
    }

    /// Record a heartbeat acknowledgement
    pub async fn record_heartbeat_ack(&self) {
        *self.last_heartbeat_ack.write().await = Some(Instant::now());
    }

    /// Time since the last heartbeat acknowledgement, if any arrived yet
    pub async fn last_ack_age(&self) -> Option<Duration> {
        self.last_heartbeat_ack.read().await.map(|at| at.elapsed())
    }

    /// Arm the liveness monitor, replacing (and aborting) any previous task
    ///
    /// Duplicate Hello envelopes re-arm the timer; the old timer must die
    /// with its replacement installed.
    pub async fn arm_heartbeat(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.heartbeat_task.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the liveness monitor task, if armed
    ///
    /// Called on session teardown; a timer firing against a dead session
    /// must be impossible.
    pub async fn abort_heartbeat(&self) {
        if let Some(task) = self.heartbeat_task.lock().await.take() {
            task.abort();
        }
    }

    /// Check whether the liveness monitor is armed
    pub async fn heartbeat_armed(&self) -> bool {
        self.heartbeat_task.lock().await.is_some()
    }

    /// Get session age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send an envelope through this session's transport
    pub async fn send(
        &self,
        envelope: Envelope,
    ) -> Result<(), mpsc::error::SendError<Envelope>> {
        self.sender.send(envelope).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

//! Error types for the Parley session core
//!
//! The taxonomy that governs session termination and send failures.
//! `DuplicateSession`, `AuthError`, and `ConnectionLost` are terminal: each
//! ends the session with a blocking notice and a forced logout, never a
//! retry. The remaining variants are reported to callers of the send
//! operations.

use thiserror::Error;

use crate::connection::CloseReason;

/// Errors surfaced by the session core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The account became active in another session.
    #[error("session already active from another device")]
    DuplicateSession,

    /// The server refused or revoked authentication.
    #[error("authentication rejected by the server")]
    AuthError,

    /// The connection dropped without a recognized close classification.
    #[error("connection to the server was lost")]
    ConnectionLost,

    /// A thread id violated the composer's caller contract. Thread ids
    /// produced by [`crate::ThreadId::private`] never trigger this.
    #[error("malformed thread id: {thread_id}")]
    InvalidThreadState { thread_id: String },

    /// A write was attempted on a connection that cannot accept it. The
    /// message is dropped, not queued.
    #[error("transport write failed: {reason}")]
    TransportWriteFailure { reason: String },
}

impl CloseReason {
    /// The terminal error corresponding to this close reason, if it is one.
    /// Locally initiated closes are expected and carry no error.
    pub fn as_error(self) -> Option<SessionError> {
        match self {
            CloseReason::DuplicateSession => Some(SessionError::DuplicateSession),
            CloseReason::AuthError => Some(SessionError::AuthError),
            CloseReason::ConnectionLost => Some(SessionError::ConnectionLost),
            CloseReason::Local => None,
        }
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

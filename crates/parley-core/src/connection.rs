//! Connection lifecycle
//!
//! Tracks the single transport connection through
//! `Connecting → Open → Closing → Closed(reason)` and classifies close and
//! error conditions into terminal reasons. Every terminal path ends the
//! session with a forced logout; there is no resumption protocol, so no
//! reconnection is ever attempted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// WebSocket close code the server uses for policy and auth violations.
pub const POLICY_VIOLATION_CLOSE_CODE: u16 = 1008;

/// Close reason attached when the account is signed in elsewhere.
pub const DUPLICATE_SESSION_CLOSE_REASON: &str = "Session already active";

/// Error-event body signalling a duplicate session.
pub const DUPLICATE_SESSION_ERROR: &str = "Session already active from another device";

// ----------------------------------------------------------------------------
// Close Classification
// ----------------------------------------------------------------------------

/// Why the connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// The account became active in another session.
    DuplicateSession,
    /// The server refused or revoked authentication.
    AuthError,
    /// The connection dropped; also the default for unrecognized codes.
    ConnectionLost,
    /// Locally initiated, expected close (application teardown).
    Local,
}

impl CloseReason {
    /// The blocking notice shown for this reason. Locally initiated closes
    /// are silent.
    pub fn notice(self) -> Option<Notice> {
        match self {
            CloseReason::DuplicateSession => Some(Notice {
                title: "Duplicate Session",
                body: "Your account is already active in another session. \
                       You will be logged out.",
            }),
            CloseReason::AuthError => Some(Notice {
                title: "Authentication Error",
                body: "An authentication error occurred. \
                       You will be redirected to the login page.",
            }),
            CloseReason::ConnectionLost => Some(Notice {
                title: "Connection Lost",
                body: "The connection was interrupted. \
                       You will be redirected to the login page.",
            }),
            CloseReason::Local => None,
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::DuplicateSession => write!(f, "duplicate session"),
            CloseReason::AuthError => write!(f, "authentication error"),
            CloseReason::ConnectionLost => write!(f, "connection lost"),
            CloseReason::Local => write!(f, "closed locally"),
        }
    }
}

/// A user-facing blocking notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub body: &'static str,
}

/// Close frame details as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    pub code: u16,
    pub reason: String,
}

/// Classify a connection close into a terminal reason.
///
/// Purely a function of the close frame and of who initiated the close. An
/// absent frame means the connection died without a close handshake.
pub fn classify_close(frame: Option<&CloseFrame>, locally_initiated: bool) -> CloseReason {
    if locally_initiated {
        return CloseReason::Local;
    }
    match frame {
        Some(frame) if frame.code == POLICY_VIOLATION_CLOSE_CODE => {
            if frame.reason == DUPLICATE_SESSION_CLOSE_REASON {
                CloseReason::DuplicateSession
            } else {
                CloseReason::AuthError
            }
        }
        _ => CloseReason::ConnectionLost,
    }
}

// ----------------------------------------------------------------------------
// Connection State
// ----------------------------------------------------------------------------

/// Lifecycle states of the transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed(CloseReason),
}

impl ConnectionState {
    /// State name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed(_) => "closed",
        }
    }
}

/// Owns the connection state machine and the single-shot termination latch.
///
/// A terminal condition may be signalled twice (an inbound duplicate-session
/// error followed by the close it provokes, or a repeated error event); the
/// latch guarantees at most one notice and at most one redirect per session.
#[derive(Debug)]
pub struct ConnectionLifecycle {
    state: ConnectionState,
    /// Reason recorded by the first terminal signal.
    terminal_reason: Option<CloseReason>,
    /// Set once terminal handling (notice, redirect arming) has been issued.
    finalized: bool,
    /// Set once the pending redirect has been handed out.
    redirect_taken: bool,
}

impl ConnectionLifecycle {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
            terminal_reason: None,
            finalized: false,
            redirect_taken: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether outbound writes are currently allowed.
    pub fn is_open(&self) -> bool {
        matches!(self.state, ConnectionState::Open)
    }

    /// Whether the session has stopped for good: no further inbound events
    /// are processed once this is true.
    pub fn is_terminal(&self) -> bool {
        self.finalized
    }

    /// The recorded terminal reason, once one exists.
    pub fn terminal_reason(&self) -> Option<CloseReason> {
        self.terminal_reason
    }

    /// Successful establishment: `Connecting → Open`.
    pub fn mark_open(&mut self) {
        if matches!(self.state, ConnectionState::Connecting) {
            self.state = ConnectionState::Open;
        }
    }

    /// Begin a fatal shutdown from an inbound error signal. The first call
    /// transitions to `Closing` and yields the notice; every later terminal
    /// signal yields nothing.
    pub fn begin_fatal(&mut self, reason: CloseReason) -> Option<Notice> {
        if self.finalized {
            return None;
        }
        self.state = ConnectionState::Closing;
        self.terminal_reason = Some(reason);
        self.finalized = true;
        reason.notice()
    }

    /// Begin a graceful, locally initiated close.
    pub fn begin_local_close(&mut self) {
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Open
        ) {
            self.state = ConnectionState::Closing;
        }
    }

    /// Record the connection as closed. Yields the terminal notice exactly
    /// once across this and [`ConnectionLifecycle::begin_fatal`]; a close
    /// that follows an already-handled fatal signal keeps the first reason.
    pub fn mark_closed(&mut self, classified: CloseReason) -> Option<Notice> {
        let reason = self.terminal_reason.unwrap_or(classified);
        self.state = ConnectionState::Closed(reason);
        if self.finalized {
            return None;
        }
        self.terminal_reason = Some(reason);
        self.finalized = true;
        reason.notice()
    }

    /// Consume the pending logout-redirect obligation, if one is owed.
    /// Locally initiated closes never owe a redirect.
    pub fn take_redirect(&mut self) -> bool {
        if self.redirect_taken {
            return false;
        }
        match self.terminal_reason {
            Some(CloseReason::Local) | None => false,
            Some(_) => {
                self.redirect_taken = true;
                true
            }
        }
    }
}

impl Default for ConnectionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(code: u16, reason: &str) -> CloseFrame {
        CloseFrame {
            code,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_classify_policy_violation_by_reason() {
        assert_eq!(
            classify_close(Some(&frame(1008, "Session already active")), false),
            CloseReason::DuplicateSession
        );
        assert_eq!(
            classify_close(Some(&frame(1008, "Not authenticated")), false),
            CloseReason::AuthError
        );
    }

    #[test]
    fn test_classify_unrecognized_codes_default_to_connection_lost() {
        assert_eq!(
            classify_close(Some(&frame(1006, "")), false),
            CloseReason::ConnectionLost
        );
        assert_eq!(
            classify_close(Some(&frame(1000, "bye")), false),
            CloseReason::ConnectionLost
        );
        assert_eq!(classify_close(None, false), CloseReason::ConnectionLost);
    }

    #[test]
    fn test_classify_local_close_wins() {
        assert_eq!(
            classify_close(Some(&frame(1008, "Session already active")), true),
            CloseReason::Local
        );
        assert_eq!(classify_close(None, true), CloseReason::Local);
    }

    #[test]
    fn test_connection_lost_notice_text() {
        let notice = CloseReason::ConnectionLost.notice().unwrap();
        assert_eq!(notice.title, "Connection Lost");
    }

    #[test]
    fn test_fatal_latch_is_single_shot() {
        let mut lifecycle = ConnectionLifecycle::new();
        lifecycle.mark_open();

        let first = lifecycle.begin_fatal(CloseReason::DuplicateSession);
        assert_eq!(first.unwrap().title, "Duplicate Session");
        assert!(lifecycle.is_terminal());

        // Repeated signal and the provoked close both stay silent.
        assert!(lifecycle.begin_fatal(CloseReason::DuplicateSession).is_none());
        assert!(lifecycle.mark_closed(CloseReason::Local).is_none());

        // The first reason survives the later close.
        assert_eq!(
            lifecycle.terminal_reason(),
            Some(CloseReason::DuplicateSession)
        );
        assert!(lifecycle.take_redirect());
        assert!(!lifecycle.take_redirect());
    }

    #[test]
    fn test_local_close_owes_no_notice_or_redirect() {
        let mut lifecycle = ConnectionLifecycle::new();
        lifecycle.mark_open();
        lifecycle.begin_local_close();

        assert!(lifecycle.mark_closed(CloseReason::Local).is_none());
        assert_eq!(lifecycle.state(), ConnectionState::Closed(CloseReason::Local));
        assert!(!lifecycle.take_redirect());
    }

    #[test]
    fn test_abnormal_close_notifies_once() {
        let mut lifecycle = ConnectionLifecycle::new();
        lifecycle.mark_open();

        let notice = lifecycle.mark_closed(CloseReason::ConnectionLost);
        assert_eq!(notice.unwrap().title, "Connection Lost");
        assert!(lifecycle.mark_closed(CloseReason::ConnectionLost).is_none());
        assert!(lifecycle.take_redirect());
    }
}

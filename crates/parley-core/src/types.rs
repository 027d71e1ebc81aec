//! Core identifier types
//!
//! Newtype wrappers for the identifiers that flow through the session core,
//! using the newtype pattern for semantic validation, plus the clock seam
//! used to stamp messages the transport left without a timestamp.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// Separator between the two participant ids in a private thread id.
/// Excluded from the identity alphabet, so two distinct unordered pairs can
/// never derive the same id.
pub const THREAD_ID_SEPARATOR: char = '_';

/// Sentinel id of the shared group thread.
const GROUP_THREAD_ID: &str = "group";

// ----------------------------------------------------------------------------
// Client Identity
// ----------------------------------------------------------------------------

/// Opaque identity of one connected session, assigned once at startup and
/// immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Get the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClientIdentity {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.contains(THREAD_ID_SEPARATOR) {
            return Err(SessionError::InvalidThreadState {
                thread_id: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Thread Identifier
// ----------------------------------------------------------------------------

/// Identifier of one logical conversation: either the `"group"` sentinel or
/// a canonical pairwise id of the form `smaller_larger`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// The shared group thread.
    pub fn group() -> Self {
        Self(GROUP_THREAD_ID.to_string())
    }

    /// Whether this is the shared group thread.
    pub fn is_group(&self) -> bool {
        self.0 == GROUP_THREAD_ID
    }

    /// Derive the canonical private thread id for two participants.
    ///
    /// Order-independent: both sides compute the same id without a
    /// handshake. Identities are compared under total lexicographic byte
    /// ordering.
    pub fn private(a: &ClientIdentity, b: &ClientIdentity) -> Self {
        let (lo, hi) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Self(format!("{lo}{THREAD_ID_SEPARATOR}{hi}"))
    }

    /// Recover the other participant of a private thread id.
    ///
    /// Fails with [`SessionError::InvalidThreadState`] when `self_id` is not
    /// one of the two components, which cannot happen for ids produced by
    /// [`ThreadId::private`].
    pub fn counterparty(&self, self_id: &ClientIdentity) -> Result<ClientIdentity, SessionError> {
        let parts: Vec<&str> = self.0.split(THREAD_ID_SEPARATOR).collect();
        match parts.as_slice() {
            [first, second] if *first == self_id.as_str() => Ok(ClientIdentity(second.to_string())),
            [first, second] if *second == self_id.as_str() => Ok(ClientIdentity(first.to_string())),
            _ => Err(SessionError::InvalidThreadState {
                thread_id: self.0.clone(),
            }),
        }
    }

    /// Get the raw thread id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ThreadId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SessionError::InvalidThreadState {
                thread_id: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Clock
// ----------------------------------------------------------------------------

/// Source of wall-clock timestamps for messages the transport did not stamp.
pub trait Clock {
    /// The current timestamp, formatted for storage.
    fn timestamp(&self) -> String;
}

/// System clock formatting UTC time the way the server wire format does.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

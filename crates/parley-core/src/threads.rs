//! Thread registry
//!
//! Owns the per-thread message logs and unread counters. Threads are created
//! lazily on first reference (incoming message, outgoing send, or explicit
//! open) and never destroyed for the lifetime of the session; history is
//! session-scoped, not persisted. All operations are total over arbitrary
//! thread ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ClientIdentity, ThreadId};

// ----------------------------------------------------------------------------
// Messages
// ----------------------------------------------------------------------------

/// Classification of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Group,
    Private,
    System,
}

/// One message in a thread's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    /// Sending session's identity, when the wire carried one. Absent for
    /// system messages.
    pub sender: Option<ClientIdentity>,
    /// Sender's display name. Absent for system messages.
    pub sender_name: Option<String>,
    pub body: String,
    /// Always populated: the wire timestamp, or the local receipt time.
    pub timestamp: String,
    /// True for this session's own optimistic echoes.
    pub originated_locally: bool,
}

impl Message {
    /// Build a system message (welcome banner, broadcast, diagnostic).
    pub fn system(body: impl Into<String>, timestamp: String) -> Self {
        Self {
            kind: MessageKind::System,
            sender: None,
            sender_name: None,
            body: body.into(),
            timestamp,
            originated_locally: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Threads
// ----------------------------------------------------------------------------

/// One logical conversation: an append-only message log in arrival order,
/// plus an unread counter.
#[derive(Debug, Clone)]
pub struct Thread {
    id: ThreadId,
    log: Vec<Message>,
    unread: u32,
}

impl Thread {
    fn new(id: ThreadId) -> Self {
        Self {
            id,
            log: Vec::new(),
            unread: 0,
        }
    }

    pub fn id(&self) -> &ThreadId {
        &self.id
    }

    /// The log, in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }
}

// ----------------------------------------------------------------------------
// Registry
// ----------------------------------------------------------------------------

/// Mapping from thread id to thread. The sole owner of thread state; other
/// components mutate threads only through these operations.
#[derive(Debug, Default)]
pub struct ThreadRegistry {
    threads: HashMap<ThreadId, Thread>,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the thread for `id`, creating an empty one if absent.
    /// Idempotent: an existing thread's log and counter are untouched.
    pub fn ensure(&mut self, id: &ThreadId) -> &mut Thread {
        self.threads
            .entry(id.clone())
            .or_insert_with(|| Thread::new(id.clone()))
    }

    /// Append a message, creating the thread if absent. Arrival order is
    /// preserved; the unread counter is left alone (the router decides).
    pub fn append(&mut self, id: &ThreadId, message: Message) {
        self.ensure(id).log.push(message);
    }

    /// Clear the unread counter. No-op for absent threads.
    pub fn mark_read(&mut self, id: &ThreadId) {
        if let Some(thread) = self.threads.get_mut(id) {
            thread.unread = 0;
        }
    }

    /// Bump the unread counter by one. No-op for the active thread, which
    /// always stays at zero unread.
    pub fn increment_unread(&mut self, id: &ThreadId, active: &ThreadId) {
        if id == active {
            return;
        }
        self.ensure(id).unread += 1;
    }

    pub fn get(&self, id: &ThreadId) -> Option<&Thread> {
        self.threads.get(id)
    }

    /// Unread count for `id`; zero for absent threads.
    pub fn unread(&self, id: &ThreadId) -> u32 {
        self.threads.get(id).map(Thread::unread).unwrap_or(0)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

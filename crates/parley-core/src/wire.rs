//! Wire protocol events
//!
//! JSON-codable records exchanged with the chat server, one tagged event per
//! frame. Field names and payload shapes follow the server wire format.

use serde::{Deserialize, Serialize};

use crate::types::{ClientIdentity, ThreadId};

// ----------------------------------------------------------------------------
// Inbound: Server → Client
// ----------------------------------------------------------------------------

/// Roster entry for one connected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUser {
    pub client_id: ClientIdentity,
    pub username: String,
}

/// Events delivered by the server over the session connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Snapshot of all currently connected users.
    OnlineUsers { users: Vec<OnlineUser> },

    /// A message in the shared group thread. The server never echoes a
    /// group message back to its sender.
    GroupMessage {
        message: String,
        #[serde(default)]
        sender_username: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },

    /// A private message, addressed by canonical thread id.
    PrivateMessage {
        message: String,
        chat_id: ThreadId,
        #[serde(default)]
        sender_username: Option<String>,
        /// Set on the copy returned to the message's own sender.
        #[serde(default)]
        is_self: bool,
        #[serde(default)]
        timestamp: Option<String>,
    },

    /// Server-synthesized broadcast (join/leave announcements).
    System {
        message: String,
        #[serde(default)]
        timestamp: Option<String>,
    },

    /// Server-reported error condition.
    Error { message: String },

    /// Any event kind this client does not recognize.
    #[serde(other)]
    Unknown,
}

// ----------------------------------------------------------------------------
// Outbound: Client → Server
// ----------------------------------------------------------------------------

/// Events this client writes to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Broadcast to the shared group thread.
    GroupMessage { message: String },

    /// Direct message to one recipient.
    PrivateMessage {
        receiver_id: ClientIdentity,
        message: String,
    },
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Parley Session Core
//!
//! Client-side session management for the Parley chat protocol: one duplex
//! connection multiplexed into a shared group thread plus any number of
//! pairwise private threads. This crate is synchronous and I/O-free; the UI
//! collaborator and the transport are injected through the [`UiHooks`] and
//! [`TransportSink`] seams, and the async connection runtime lives in
//! `parley-ws`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod connection;
pub mod errors;
pub mod session;
pub mod threads;
pub mod types;
pub mod wire;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::SessionConfig;
pub use connection::{
    classify_close, CloseFrame, CloseReason, ConnectionLifecycle, ConnectionState, Notice,
};
pub use errors::{Result, SessionError};
pub use session::{ChatSession, TransportSink, UiHooks};
pub use threads::{Message, MessageKind, Thread, ThreadRegistry};
pub use types::{ClientIdentity, Clock, SystemClock, ThreadId};
pub use wire::{InboundEvent, OnlineUser, OutboundEvent};

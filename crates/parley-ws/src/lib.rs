//! Parley WebSocket Runtime
//!
//! The asynchronous half of the connection lifecycle: owns the
//! tokio-tungstenite connection, feeds inbound frames and UI commands through
//! the session coordinator strictly in arrival order, and executes the
//! post-error redirect delay. All session semantics live in `parley-core`;
//! this crate only moves bytes and time.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod client;
pub mod transport;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use client::{run_session, session_endpoint, ClientError, Command};
pub use transport::WsSink;

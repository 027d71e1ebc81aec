//! Application wiring
//!
//! Mints the session identity, connects the terminal to the session runtime,
//! and runs one chat session to completion.

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use parley_core::ClientIdentity;

use crate::config::AppConfig;
use crate::error::Result;
use crate::terminal::{self, TerminalUi};

/// The terminal chat application.
pub struct ParleyApp {
    config: AppConfig,
}

impl ParleyApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run one chat session to completion.
    ///
    /// The protocol has no resumption, so once the connection ends this
    /// returns instead of reconnecting.
    pub async fn run(self) -> Result<()> {
        // Minted once per session; the simple uuid form contains no
        // thread-id separator.
        let identity: ClientIdentity = Uuid::new_v4().simple().to_string().parse()?;
        info!(%identity, "starting session as {}", self.config.user.display_name);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let input = tokio::spawn(terminal::input_loop(command_tx));

        let reason = parley_ws::run_session(
            &self.config.server.url,
            identity,
            &self.config.user.display_name,
            self.config.session.clone(),
            TerminalUi::new(),
            command_rx,
        )
        .await?;

        input.abort();
        match reason.as_error() {
            None => info!("session closed"),
            Some(err) => warn!(%err, "session terminated"),
        }
        Ok(())
    }
}

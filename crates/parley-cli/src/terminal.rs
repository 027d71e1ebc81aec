//! Terminal interface
//!
//! The UI collaborator for a line-oriented terminal: implements the session's
//! rendering hooks on stdout and pumps stdin lines into the session command
//! channel.

use std::collections::HashSet;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use parley_core::{Message, MessageKind, OnlineUser, ThreadId, UiHooks};
use parley_ws::Command;

use crate::commands::{parse_line, ParsedLine, HELP_TEXT};

// ----------------------------------------------------------------------------
// UI Hooks
// ----------------------------------------------------------------------------

/// Terminal implementation of the session's UI hooks.
#[derive(Debug, Default)]
pub struct TerminalUi {
    /// Private threads already announced, so repeated entry requests from
    /// the router stay quiet.
    known_threads: HashSet<ThreadId>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiHooks for TerminalUi {
    fn render_thread(&mut self, messages: &[Message]) {
        println!("----------------------------------------");
        for message in messages {
            match message.kind {
                MessageKind::System => {
                    println!("[{}] * {}", message.timestamp, message.body);
                }
                _ => {
                    let sender = if message.originated_locally {
                        "You"
                    } else {
                        message.sender_name.as_deref().unwrap_or("unknown")
                    };
                    println!("[{}] {}: {}", message.timestamp, sender, message.body);
                }
            }
        }
    }

    fn render_roster(&mut self, users: &[OnlineUser]) {
        println!("online now:");
        for user in users {
            println!("  {} ({})", user.username, user.client_id);
        }
    }

    fn show_blocking_notice(&mut self, title: &str, body: &str) {
        println!();
        println!("=== {title} ===");
        println!("{body}");
    }

    fn redirect_to(&mut self, path: &str) {
        println!("session ended, navigating to {path}");
    }

    fn ensure_thread_entry(&mut self, thread_id: &ThreadId, title: &str) {
        if self.known_threads.insert(thread_id.clone()) {
            println!("private thread with {title} available: /switch {thread_id}");
        }
    }

    fn unread_changed(&mut self, thread_id: &ThreadId, unread: u32) {
        if unread > 0 {
            println!("({unread} unread in {thread_id})");
        }
    }
}

// ----------------------------------------------------------------------------
// Input Loop
// ----------------------------------------------------------------------------

/// Pump stdin lines into the session command channel until EOF or `/quit`.
pub async fn input_loop(commands: mpsc::UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                ParsedLine::Empty => {}
                ParsedLine::Help => println!("{HELP_TEXT}"),
                ParsedLine::Unrecognized(message) => println!("{message}"),
                ParsedLine::Command(command) => {
                    let is_shutdown = matches!(command, Command::Shutdown);
                    if commands.send(command).is_err() || is_shutdown {
                        break;
                    }
                }
            },
            Ok(None) => {
                // EOF: same as an explicit /quit.
                let _ = commands.send(Command::Shutdown);
                break;
            }
            Err(err) => {
                warn!(%err, "stdin read failed");
                let _ = commands.send(Command::Shutdown);
                break;
            }
        }
    }
}

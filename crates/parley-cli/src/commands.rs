//! Input line parsing
//!
//! Translates terminal input lines into session runtime commands. Plain text
//! goes to the active thread; slash commands manage threads and teardown.

use parley_core::{ClientIdentity, ThreadId};
use parley_ws::Command;

/// Result of parsing one input line.
#[derive(Debug, Clone)]
pub enum ParsedLine {
    /// Forward to the session runtime.
    Command(Command),
    /// Print the command reference.
    Help,
    /// Nothing to do.
    Empty,
    /// Bad input, with a message for the user.
    Unrecognized(String),
}

/// Parse one line of terminal input.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Empty;
    }
    if !line.starts_with('/') {
        return ParsedLine::Command(Command::Send {
            body: line.to_string(),
        });
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/quit" | "/exit" => ParsedLine::Command(Command::Shutdown),
        "/help" => ParsedLine::Help,
        "/group" => ParsedLine::Command(Command::SwitchThread {
            thread_id: ThreadId::group(),
        }),
        "/switch" => match parts.next() {
            Some(raw) => match raw.parse::<ThreadId>() {
                Ok(thread_id) => ParsedLine::Command(Command::SwitchThread { thread_id }),
                Err(_) => ParsedLine::Unrecognized(format!("bad thread id: {raw}")),
            },
            None => ParsedLine::Unrecognized("usage: /switch <thread_id>".to_string()),
        },
        "/pm" => match parts.next() {
            Some(raw) => match raw.parse::<ClientIdentity>() {
                Ok(identity) => {
                    let rest: Vec<&str> = parts.collect();
                    let display_name = if rest.is_empty() {
                        identity.to_string()
                    } else {
                        rest.join(" ")
                    };
                    ParsedLine::Command(Command::StartPrivate {
                        identity,
                        display_name,
                    })
                }
                Err(_) => ParsedLine::Unrecognized(format!("bad client id: {raw}")),
            },
            None => ParsedLine::Unrecognized("usage: /pm <client_id> [name]".to_string()),
        },
        other => ParsedLine::Unrecognized(format!("unknown command: {other} (try /help)")),
    }
}

/// Command reference printed for `/help`.
pub const HELP_TEXT: &str = "\
commands:
  <text>                  send to the active thread
  /pm <client_id> [name]  open a private thread with a user
  /switch <thread_id>     switch to a thread
  /group                  switch to the group thread
  /help                   show this reference
  /quit                   leave the chat";

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_sends_to_active_thread() {
        match parse_line("  hello there  ") {
            ParsedLine::Command(Command::Send { body }) => assert_eq!(body, "hello there"),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_pm_with_and_without_name() {
        match parse_line("/pm u2 Bob the Builder") {
            ParsedLine::Command(Command::StartPrivate {
                identity,
                display_name,
            }) => {
                assert_eq!(identity.as_str(), "u2");
                assert_eq!(display_name, "Bob the Builder");
            }
            other => panic!("unexpected parse: {other:?}"),
        }
        match parse_line("/pm u2") {
            ParsedLine::Command(Command::StartPrivate { display_name, .. }) => {
                assert_eq!(display_name, "u2")
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_pm_rejects_identity_with_separator() {
        assert!(matches!(
            parse_line("/pm u_2"),
            ParsedLine::Unrecognized(_)
        ));
    }

    #[test]
    fn test_quit_and_unknown() {
        assert!(matches!(
            parse_line("/quit"),
            ParsedLine::Command(Command::Shutdown)
        ));
        assert!(matches!(parse_line("/dance"), ParsedLine::Unrecognized(_)));
        assert!(matches!(parse_line("   "), ParsedLine::Empty));
    }
}

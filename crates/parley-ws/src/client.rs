//! Session connection runtime
//!
//! Connects to the chat server and runs the single-threaded session event
//! loop: inbound frames and UI commands interleave only at the `select!`
//! suspension points, and each is processed to completion before the next,
//! preserving per-thread ordering. The only other asynchronous wait is the
//! fixed post-error delay before the logout redirect.

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};
use url::Url;

use parley_core::{
    ChatSession, ClientIdentity, CloseFrame, CloseReason, SessionConfig, SystemClock, ThreadId,
    UiHooks,
};

use crate::transport::WsSink;

// ----------------------------------------------------------------------------
// Commands: UI → Session Runtime
// ----------------------------------------------------------------------------

/// Commands sent from the UI collaborator into the session runtime.
#[derive(Debug, Clone)]
pub enum Command {
    /// Send a message to the active thread.
    Send { body: String },
    /// Switch the active thread.
    SwitchThread { thread_id: ThreadId },
    /// Open a private thread with a roster peer and switch to it.
    StartPrivate {
        identity: ClientIdentity,
        display_name: String,
    },
    /// Tear the session down gracefully.
    Shutdown,
}

// ----------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------

/// Errors from the connection runtime.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),

    #[error("websocket connection failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Build the session endpoint for one client: `{base}/ws/{client_id}`.
pub fn session_endpoint(base: &str, identity: &ClientIdentity) -> Result<Url, ClientError> {
    let base = base.trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/ws/{identity}"))?)
}

// ----------------------------------------------------------------------------
// Session Loop
// ----------------------------------------------------------------------------

/// Connect and run one chat session to completion.
///
/// Returns the terminal close reason. Every terminal path ends the session;
/// reconnection is never attempted.
pub async fn run_session<H>(
    base_url: &str,
    identity: ClientIdentity,
    display_name: &str,
    config: SessionConfig,
    hooks: H,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> Result<CloseReason, ClientError>
where
    H: UiHooks,
{
    let endpoint = session_endpoint(base_url, &identity)?;
    let (stream, _response) = connect_async(endpoint.as_str()).await?;
    info!(%endpoint, "connected");

    let (write, mut read) = stream.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(write, out_rx));

    let mut session = ChatSession::new(
        identity,
        display_name,
        config.clone(),
        hooks,
        WsSink::new(out_tx),
        SystemClock,
    );
    session.on_open();

    let mut locally_initiated = false;
    let mut commands_open = true;

    while !session.is_terminal() {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => session.handle_frame(&text),
                Some(Ok(WsMessage::Close(frame))) => {
                    let frame = frame.map(|frame| CloseFrame {
                        code: u16::from(frame.code),
                        reason: frame.reason.into_owned(),
                    });
                    session.on_close(frame.as_ref(), locally_initiated);
                }
                Some(Ok(_)) => {} // ping/pong/binary: nothing to route
                Some(Err(err)) => {
                    warn!(%err, "websocket read failed");
                    session.on_close(None, locally_initiated);
                }
                None => session.on_close(None, locally_initiated),
            },
            command = commands.recv(), if commands_open => match command {
                Some(command) => handle_command(&mut session, &mut locally_initiated, command),
                None => {
                    // UI went away; same as an explicit shutdown.
                    commands_open = false;
                    locally_initiated = true;
                    session.shutdown();
                }
            },
        }
    }

    let reason = session.terminal_reason().unwrap_or(CloseReason::Local);
    if reason != CloseReason::Local {
        // The blocking notice gets its display window, then the redirect.
        tokio::time::sleep(config.redirect_delay()).await;
        session.finish_redirect();
    }

    drop(session);
    let _ = writer.await;
    Ok(reason)
}

fn handle_command<H>(
    session: &mut ChatSession<H, WsSink, SystemClock>,
    locally_initiated: &mut bool,
    command: Command,
) where
    H: UiHooks,
{
    match command {
        Command::Send { body } => {
            if let Err(err) = session.send_to_active(&body) {
                warn!(%err, "send failed; message dropped");
            }
        }
        Command::SwitchThread { thread_id } => session.switch_active_thread(&thread_id),
        Command::StartPrivate {
            identity,
            display_name,
        } => {
            session.start_private_thread_with(&identity, &display_name);
        }
        Command::Shutdown => {
            *locally_initiated = true;
            session.shutdown();
        }
    }
}

/// Drain outbound frames into the socket until the session drops the channel.
async fn write_loop(
    mut write: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>,
    mut out_rx: mpsc::UnboundedReceiver<WsMessage>,
) {
    while let Some(message) = out_rx.recv().await {
        if let Err(err) = write.send(message).await {
            warn!(%err, "websocket write failed");
            break;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

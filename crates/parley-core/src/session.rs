//! Session coordinator
//!
//! Routes inbound events to threads, composes outbound sends with optimistic
//! local echo, and drives the connection lifecycle. Everything user-visible
//! flows through the injected [`UiHooks`]; every wire write goes through the
//! injected [`TransportSink`]. The coordinator is the sole owner of the
//! active-thread pointer and of the thread registry.

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::connection::{
    classify_close, CloseFrame, CloseReason, ConnectionLifecycle, ConnectionState,
    DUPLICATE_SESSION_ERROR,
};
use crate::errors::{Result, SessionError};
use crate::threads::{Message, MessageKind, Thread, ThreadRegistry};
use crate::types::{ClientIdentity, Clock, ThreadId};
use crate::wire::{InboundEvent, OnlineUser, OutboundEvent};

// ----------------------------------------------------------------------------
// Collaborator Seams
// ----------------------------------------------------------------------------

/// Rendering and navigation callbacks supplied by the UI collaborator.
pub trait UiHooks {
    /// Re-render the active thread's full log, in arrival order.
    fn render_thread(&mut self, messages: &[Message]);

    /// Render a roster snapshot, forwarded verbatim from the server.
    fn render_roster(&mut self, users: &[OnlineUser]);

    /// Show a dismissible blocking notice.
    fn show_blocking_notice(&mut self, title: &str, body: &str);

    /// Navigate the session away. Called at most once, after the terminal
    /// notice; the runtime owns the delay in between.
    fn redirect_to(&mut self, path: &str);

    /// Make a thread entry visible in the thread list without opening it.
    /// Implementations must tolerate repeated calls for the same thread.
    fn ensure_thread_entry(&mut self, thread_id: &ThreadId, title: &str);

    /// The unread counter of a thread changed.
    fn unread_changed(&mut self, thread_id: &ThreadId, unread: u32);
}

/// Write side of the transport connection.
pub trait TransportSink {
    /// Emit exactly one wire event. Fails with
    /// [`SessionError::TransportWriteFailure`] when the connection cannot
    /// accept writes; the event is dropped, never queued.
    fn send(&mut self, event: &OutboundEvent) -> Result<()>;

    /// Request connection close.
    fn close(&mut self);
}

// ----------------------------------------------------------------------------
// Session Coordinator
// ----------------------------------------------------------------------------

/// Client-side session state: one connection, many threads, one active.
pub struct ChatSession<H, T, C> {
    identity: ClientIdentity,
    display_name: String,
    config: SessionConfig,
    registry: ThreadRegistry,
    active: ThreadId,
    lifecycle: ConnectionLifecycle,
    hooks: H,
    transport: T,
    clock: C,
}

impl<H, T, C> ChatSession<H, T, C>
where
    H: UiHooks,
    T: TransportSink,
    C: Clock,
{
    pub fn new(
        identity: ClientIdentity,
        display_name: impl Into<String>,
        config: SessionConfig,
        hooks: H,
        transport: T,
        clock: C,
    ) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            config,
            registry: ThreadRegistry::new(),
            active: ThreadId::group(),
            lifecycle: ConnectionLifecycle::new(),
            hooks,
            transport,
            clock,
        }
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn active_thread(&self) -> &ThreadId {
        &self.active
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    pub fn thread(&self, id: &ThreadId) -> Option<&Thread> {
        self.registry.get(id)
    }

    /// Unread count for a thread; zero for absent threads.
    pub fn unread(&self, id: &ThreadId) -> u32 {
        self.registry.unread(id)
    }

    /// True once the session has stopped for good; no further inbound
    /// events will be processed.
    pub fn is_terminal(&self) -> bool {
        self.lifecycle.is_terminal()
    }

    pub fn terminal_reason(&self) -> Option<CloseReason> {
        self.lifecycle.terminal_reason()
    }

    // ------------------------------------------------------------------
    // Connection Lifecycle
    // ------------------------------------------------------------------

    /// Transport established: ensure the group thread exists and post the
    /// locally-synthesized welcome message.
    pub fn on_open(&mut self) {
        self.lifecycle.mark_open();
        let welcome = Message::system(
            format!("Welcome {} to the chat", self.display_name),
            self.clock.timestamp(),
        );
        self.registry.append(&ThreadId::group(), welcome);
        self.render_active();
    }

    /// Transport closed. Classifies the close, shows the terminal notice at
    /// most once, and arms the logout redirect for non-local reasons.
    pub fn on_close(&mut self, frame: Option<&CloseFrame>, locally_initiated: bool) {
        let classified = classify_close(frame, locally_initiated);
        debug!(reason = %classified, "connection closed");
        if let Some(notice) = self.lifecycle.mark_closed(classified) {
            self.hooks.show_blocking_notice(notice.title, notice.body);
        }
    }

    /// Fire the pending logout redirect, if one is owed. Idempotent; the
    /// caller is responsible for the configured delay beforehand.
    pub fn finish_redirect(&mut self) {
        if self.lifecycle.take_redirect() {
            self.hooks.redirect_to(&self.config.logout_path);
        }
    }

    /// Graceful, locally initiated teardown. No notice, no redirect.
    pub fn shutdown(&mut self) {
        self.lifecycle.begin_local_close();
        self.transport.close();
    }

    // ------------------------------------------------------------------
    // Inbound Routing
    // ------------------------------------------------------------------

    /// Decode and route one raw transport frame. Undecodable frames degrade
    /// to a diagnostic in the active thread; the router never fails.
    pub fn handle_frame(&mut self, raw: &str) {
        if self.lifecycle.is_terminal() {
            return;
        }
        match serde_json::from_str::<InboundEvent>(raw) {
            Ok(event) => self.handle_inbound(event),
            Err(err) => {
                warn!(%err, "undecodable frame from server");
                self.append_diagnostic(format!("undecodable event from server: {err}"));
            }
        }
    }

    /// Route one decoded inbound event. Events are processed strictly in
    /// arrival order, and nothing is handled once a fatal shutdown begins.
    pub fn handle_inbound(&mut self, event: InboundEvent) {
        if self.lifecycle.is_terminal() {
            return;
        }
        match event {
            InboundEvent::Error { message } => self.handle_error_event(message),
            InboundEvent::OnlineUsers { users } => self.hooks.render_roster(&users),
            InboundEvent::GroupMessage {
                message,
                sender_username,
                timestamp,
            } => self.handle_group_message(message, sender_username, timestamp),
            InboundEvent::PrivateMessage {
                message,
                chat_id,
                sender_username,
                is_self,
                timestamp,
            } => self.handle_private_message(message, chat_id, sender_username, is_self, timestamp),
            InboundEvent::System { message, timestamp } => {
                self.handle_system_message(message, timestamp)
            }
            InboundEvent::Unknown => {
                debug!("unrecognized event kind from server");
                self.append_diagnostic("unrecognized event from server".to_string());
            }
        }
    }

    fn handle_error_event(&mut self, message: String) {
        if message == DUPLICATE_SESSION_ERROR {
            warn!("duplicate session signalled by server, shutting down");
            if let Some(notice) = self.lifecycle.begin_fatal(CloseReason::DuplicateSession) {
                self.hooks.show_blocking_notice(notice.title, notice.body);
                self.transport.close();
            }
        } else {
            self.append_diagnostic(format!("server error: {message}"));
        }
    }

    fn handle_group_message(
        &mut self,
        body: String,
        sender_name: Option<String>,
        timestamp: Option<String>,
    ) {
        let message = Message {
            kind: MessageKind::Group,
            sender: None,
            sender_name,
            body,
            timestamp: self.timestamp_or_now(timestamp),
            originated_locally: false,
        };
        let group = ThreadId::group();
        self.registry.append(&group, message);
        if self.active == group {
            self.render_active();
        } else {
            self.bump_unread(&group);
        }
    }

    fn handle_private_message(
        &mut self,
        body: String,
        chat_id: ThreadId,
        sender_name: Option<String>,
        is_self: bool,
        timestamp: Option<String>,
    ) {
        // Re-derive the canonical id from the counterparty rather than
        // trusting the wire string as-is.
        let counterparty = match chat_id.counterparty(&self.identity) {
            Ok(counterparty) => counterparty,
            Err(_) => {
                warn!(%chat_id, "private message for a thread this session is not part of");
                self.append_diagnostic(format!("private message for foreign thread {chat_id}"));
                return;
            }
        };
        let thread_id = ThreadId::private(&self.identity, &counterparty);

        let message = Message {
            kind: MessageKind::Private,
            sender: Some(if is_self {
                self.identity.clone()
            } else {
                counterparty.clone()
            }),
            sender_name: sender_name.clone(),
            body,
            timestamp: self.timestamp_or_now(timestamp),
            originated_locally: is_self,
        };

        self.registry.ensure(&thread_id);
        if !is_self {
            let title = sender_name.unwrap_or_else(|| counterparty.to_string());
            self.hooks.ensure_thread_entry(&thread_id, &title);
            self.bump_unread(&thread_id);
        }
        self.registry.append(&thread_id, message);
        if self.active == thread_id {
            self.render_active();
        }
    }

    fn handle_system_message(&mut self, body: String, timestamp: Option<String>) {
        let group = ThreadId::group();
        let timestamp = self.timestamp_or_now(timestamp);
        self.registry.append(&group, Message::system(body, timestamp));
        if self.active == group {
            self.render_active();
        }
    }

    /// Append a system-tagged diagnostic to the active thread.
    fn append_diagnostic(&mut self, body: String) {
        let timestamp = self.clock.timestamp();
        let active = self.active.clone();
        self.registry.append(&active, Message::system(body, timestamp));
        self.render_active();
    }

    // ------------------------------------------------------------------
    // UI-Facing Operations
    // ------------------------------------------------------------------

    /// Switch the active thread: mark it read, move the pointer, render its
    /// full log. The only operation that moves the active-thread pointer.
    pub fn switch_active_thread(&mut self, thread_id: &ThreadId) {
        self.registry.ensure(thread_id);
        self.registry.mark_read(thread_id);
        self.active = thread_id.clone();
        self.hooks.unread_changed(thread_id, 0);
        self.render_active();
    }

    /// Open (or create) the private thread with `identity` and switch to it.
    pub fn start_private_thread_with(
        &mut self,
        identity: &ClientIdentity,
        display_name: &str,
    ) -> ThreadId {
        let thread_id = ThreadId::private(&self.identity, identity);
        self.registry.ensure(&thread_id);
        self.hooks.ensure_thread_entry(&thread_id, display_name);
        self.switch_active_thread(&thread_id);
        thread_id
    }

    /// Send to the shared group thread, with optimistic local echo.
    /// Whitespace-only bodies are a no-op, not an error.
    pub fn send_group(&mut self, body: &str) -> Result<()> {
        let Some(body) = trimmed(body) else {
            return Ok(());
        };
        self.ensure_writable()?;
        self.transport.send(&OutboundEvent::GroupMessage {
            message: body.to_string(),
        })?;
        self.echo_local(ThreadId::group(), MessageKind::Group, body);
        Ok(())
    }

    /// Send to a private thread, with optimistic local echo. The thread id
    /// must contain this session's identity as one of its two components.
    pub fn send_private(&mut self, thread_id: &ThreadId, body: &str) -> Result<()> {
        let Some(body) = trimmed(body) else {
            return Ok(());
        };
        let receiver_id = thread_id.counterparty(&self.identity)?;
        self.ensure_writable()?;
        self.transport.send(&OutboundEvent::PrivateMessage {
            receiver_id,
            message: body.to_string(),
        })?;
        self.echo_local(thread_id.clone(), MessageKind::Private, body);
        Ok(())
    }

    /// Send to whichever thread is currently active.
    pub fn send_to_active(&mut self, body: &str) -> Result<()> {
        let active = self.active.clone();
        if active.is_group() {
            self.send_group(body)
        } else {
            self.send_private(&active, body)
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_writable(&self) -> Result<()> {
        if self.lifecycle.is_open() {
            Ok(())
        } else {
            Err(SessionError::TransportWriteFailure {
                reason: format!("connection is {}", self.lifecycle.state().name()),
            })
        }
    }

    fn echo_local(&mut self, thread_id: ThreadId, kind: MessageKind, body: &str) {
        let message = Message {
            kind,
            sender: Some(self.identity.clone()),
            sender_name: Some(self.display_name.clone()),
            body: body.to_string(),
            timestamp: self.clock.timestamp(),
            originated_locally: true,
        };
        self.registry.append(&thread_id, message);
        if self.active == thread_id {
            self.render_active();
        }
    }

    fn bump_unread(&mut self, thread_id: &ThreadId) {
        if *thread_id == self.active {
            return;
        }
        self.registry.increment_unread(thread_id, &self.active);
        let unread = self.registry.unread(thread_id);
        self.hooks.unread_changed(thread_id, unread);
    }

    fn timestamp_or_now(&self, wire: Option<String>) -> String {
        wire.unwrap_or_else(|| self.clock.timestamp())
    }

    fn render_active(&mut self) {
        let messages = match self.registry.get(&self.active) {
            Some(thread) => thread.messages(),
            None => &[],
        };
        self.hooks.render_thread(messages);
    }
}

fn trimmed(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

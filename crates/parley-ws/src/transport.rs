//! WebSocket transport sink
//!
//! Bridges the synchronous [`TransportSink`] seam onto the writer task's
//! channel. Sends are non-blocking pushes; once the sink is closed, or the
//! writer task is gone, writes fail with `TransportWriteFailure` and the
//! event is dropped, never queued.

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use parley_core::{OutboundEvent, SessionError, TransportSink};

/// Write side of the session's WebSocket connection.
pub struct WsSink {
    out_tx: mpsc::UnboundedSender<WsMessage>,
    closed: bool,
}

impl WsSink {
    /// Wrap the sender half of a writer task's channel.
    pub fn new(out_tx: mpsc::UnboundedSender<WsMessage>) -> Self {
        Self {
            out_tx,
            closed: false,
        }
    }
}

impl TransportSink for WsSink {
    fn send(&mut self, event: &OutboundEvent) -> parley_core::Result<()> {
        if self.closed {
            return Err(SessionError::TransportWriteFailure {
                reason: "connection closed locally".to_string(),
            });
        }
        let payload =
            serde_json::to_string(event).map_err(|err| SessionError::TransportWriteFailure {
                reason: err.to_string(),
            })?;
        self.out_tx
            .send(WsMessage::Text(payload))
            .map_err(|_| SessionError::TransportWriteFailure {
                reason: "writer task has stopped".to_string(),
            })
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.out_tx.send(WsMessage::Close(None));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> (WsSink, mpsc::UnboundedReceiver<WsMessage>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        (WsSink::new(out_tx), out_rx)
    }

    #[test]
    fn test_send_serializes_one_text_frame() {
        let (mut sink, mut out_rx) = sink();

        sink.send(&OutboundEvent::GroupMessage {
            message: "hi".to_string(),
        })
        .unwrap();

        match out_rx.try_recv().unwrap() {
            WsMessage::Text(payload) => {
                assert_eq!(payload, r#"{"type":"group_message","message":"hi"}"#)
            }
            other => panic!("unexpected frame: {other:?}"),
        }
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn test_close_is_idempotent_and_blocks_further_sends() {
        let (mut sink, mut out_rx) = sink();

        sink.close();
        sink.close();

        assert!(matches!(out_rx.try_recv().unwrap(), WsMessage::Close(None)));
        assert!(out_rx.try_recv().is_err());

        let err = sink
            .send(&OutboundEvent::GroupMessage {
                message: "late".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::TransportWriteFailure { .. }));
    }

    #[test]
    fn test_send_fails_when_writer_is_gone() {
        let (mut sink, out_rx) = sink();
        drop(out_rx);

        let err = sink
            .send(&OutboundEvent::GroupMessage {
                message: "hi".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::TransportWriteFailure { .. }));
    }
}

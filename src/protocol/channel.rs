use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::command::Command;
use super::push::{self, Inbound, Push};

/// Locally-assigned id of one `send`. The wire protocol has no message
/// ids, so this never leaves the process; it exists for logging and so a
/// caller can tell which request a resolution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("no reply from backend within {0:?}")]
    NoReply(Duration),
    #[error("message channel closed")]
    Closed,
}

/// The UI end of the bidirectional transport: outbound command lines,
/// inbound reply/push lines. The transport below is assumed reliable and
/// in-order on a single connection.
pub struct Transport {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// The backend end of an in-process transport pair.
pub struct TransportPeer {
    pub from_ui: mpsc::UnboundedReceiver<String>,
    pub to_ui: mpsc::UnboundedSender<String>,
}

impl Transport {
    /// A connected in-process pair; used by the dev backend and tests.
    pub fn pair() -> (Transport, TransportPeer) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Transport {
                outbound: out_tx,
                inbound: in_rx,
            },
            TransportPeer {
                from_ui: out_rx,
                to_ui: in_tx,
            },
        )
    }
}

type PendingQueue = Arc<Mutex<VecDeque<(RequestId, oneshot::Sender<Value>)>>>;

/// Handle for one outstanding request. Await `resolve` for the reply, or
/// drop it for fire-and-forget; an abandoned request still consumes its
/// reply slot so later requests are never misattributed.
pub struct PendingReply {
    pub id: RequestId,
    rx: oneshot::Receiver<Value>,
    timeout: Duration,
}

impl PendingReply {
    pub async fn resolve(self) -> Result<Value, ChannelError> {
        match tokio::time::timeout(self.timeout, self.rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => Err(ChannelError::NoReply(self.timeout)),
        }
    }
}

/// Wraps the single message channel to the backend process.
///
/// Replies carry no correlation ids on the wire: the next reply-shaped
/// message resolves the OLDEST outstanding send (FIFO, matching the
/// backend's in-order handling). Pushes are fanned out on a separate
/// receiver and may interleave with replies in any order.
pub struct MessageChannel {
    outbound: mpsc::UnboundedSender<String>,
    pending: PendingQueue,
    next_id: AtomicU64,
    reply_timeout: Duration,
}

impl MessageChannel {
    /// Spawns the reader task and returns the channel plus the push
    /// receiver — the single delivery path for every non-reply message.
    pub fn spawn(
        transport: Transport,
        reply_timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Push>) {
        let (push_tx, push_rx) = mpsc::unbounded_channel();
        let pending: PendingQueue = Arc::new(Mutex::new(VecDeque::new()));

        let reader_pending = pending.clone();
        let mut inbound = transport.inbound;
        tokio::spawn(async move {
            while let Some(line) = inbound.recv().await {
                match push::classify(&line) {
                    Ok(Inbound::Push(p)) => {
                        if push_tx.send(p).is_err() {
                            break;
                        }
                    }
                    Ok(Inbound::Reply(value)) => {
                        let waiter = reader_pending
                            .lock()
                            .expect("pending queue lock poisoned")
                            .pop_front();
                        match waiter {
                            Some((id, tx)) => {
                                if tx.send(value).is_err() {
                                    tracing::debug!(%id, "discarding reply to abandoned request");
                                }
                            }
                            None => tracing::warn!("reply with no outstanding request"),
                        }
                    }
                    Err(err) => tracing::warn!(%err, "dropping undecodable message"),
                }
            }
            tracing::debug!("transport closed, reader task exiting");
        });

        (
            Self {
                outbound: transport.outbound,
                pending,
                next_id: AtomicU64::new(1),
                reply_timeout,
            },
            push_rx,
        )
    }

    /// Encode and send one command. Callers must serialize logically
    /// dependent commands: under FIFO correlation, a second in-flight
    /// request of the same kind risks reply misattribution.
    pub fn send(&self, command: &Command) -> Result<PendingReply, ChannelError> {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();

        // Register the waiter before writing so a fast reply cannot race it.
        self.pending
            .lock()
            .expect("pending queue lock poisoned")
            .push_back((id, tx));

        tracing::debug!(%id, verb = %command.verb, "sending command");
        if self.outbound.send(command.encode()).is_err() {
            self.pending
                .lock()
                .expect("pending queue lock poisoned")
                .retain(|(pending_id, _)| *pending_id != id);
            return Err(ChannelError::Closed);
        }

        Ok(PendingReply {
            id,
            rx,
            timeout: self.reply_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn channel_with_peer(timeout: Duration) -> (MessageChannel, mpsc::UnboundedReceiver<Push>, TransportPeer) {
        let (transport, peer) = Transport::pair();
        let (channel, push_rx) = MessageChannel::spawn(transport, timeout);
        (channel, push_rx, peer)
    }

    #[tokio::test]
    async fn send_resolves_to_reply() {
        let (channel, _push_rx, mut peer) = channel_with_peer(Duration::from_secs(1));

        let pending = channel.send(&Command::toggle_timesheet()).unwrap();
        assert_eq!(peer.from_ui.recv().await.unwrap(), "timesheet");
        peer.to_ui.send("true".to_string()).unwrap();

        assert_eq!(pending.resolve().await.unwrap(), json!(true));
    }

    #[tokio::test]
    async fn replies_resolve_outstanding_sends_in_fifo_order() {
        let (channel, _push_rx, mut peer) = channel_with_peer(Duration::from_secs(1));

        let first = channel.send(&Command::toggle_timesheet()).unwrap();
        let second = channel.send(&Command::toggle_settings()).unwrap();
        assert_eq!(peer.from_ui.recv().await.unwrap(), "timesheet");
        assert_eq!(peer.from_ui.recv().await.unwrap(), "settings");

        peer.to_ui.send("1".to_string()).unwrap();
        peer.to_ui.send("2".to_string()).unwrap();

        assert_eq!(first.resolve().await.unwrap(), json!(1));
        assert_eq!(second.resolve().await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn pushes_interleave_without_consuming_reply_slots() {
        let (channel, mut push_rx, mut peer) = channel_with_peer(Duration::from_secs(1));

        let pending = channel.send(&Command::refresh()).unwrap();
        peer.from_ui.recv().await.unwrap();

        peer.to_ui
            .send(r#"{"Type":"error","Message":"boom"}"#.to_string())
            .unwrap();
        peer.to_ui.send("null".to_string()).unwrap();

        assert!(matches!(push_rx.recv().await, Some(Push::Error { .. })));
        assert_eq!(pending.resolve().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn abandoned_request_still_consumes_its_reply() {
        let (channel, _push_rx, mut peer) = channel_with_peer(Duration::from_millis(10));

        let first = channel.send(&Command::refresh()).unwrap();
        assert!(matches!(
            first.resolve().await,
            Err(ChannelError::NoReply(_))
        ));

        let second = channel.send(&Command::toggle_settings()).unwrap();
        peer.from_ui.recv().await.unwrap();
        peer.from_ui.recv().await.unwrap();

        // Late reply to the abandoned first request, then the real one.
        peer.to_ui.send("\"stale\"".to_string()).unwrap();
        peer.to_ui.send("true".to_string()).unwrap();

        let second = PendingReply {
            timeout: Duration::from_secs(1),
            ..second
        };
        assert_eq!(second.resolve().await.unwrap(), json!(true));
    }

    #[tokio::test]
    async fn send_fails_once_transport_is_gone() {
        let (channel, _push_rx, peer) = channel_with_peer(Duration::from_secs(1));
        drop(peer);
        assert!(matches!(
            channel.send(&Command::refresh()),
            Err(ChannelError::Closed)
        ));
    }
}

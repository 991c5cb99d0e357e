use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bytes::Bytes;
use rfprims_frame::{encode_to_bytes, CommandName, Frame};

use crate::error::Result;

/// Callback invoked with the response that matches an enqueued request.
pub type ResponseCallback = Box<dyn FnOnce(Frame) + Send + 'static>;

/// Transmit hook wired in by the coordinator; receives encoded frames.
pub(crate) type TransmitFn = Box<dyn Fn(Bytes) -> Result<()> + Send + Sync + 'static>;

/// Key identifying which pending request a response belongs to.
///
/// Responses carry no sequence number on this wire, only the echoed
/// command name. Local and remote requests are keyed separately so a
/// local response can never consume a remote request's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PendingKey {
    name: CommandName,
    remote: bool,
}

impl PendingKey {
    fn for_frame(frame: &Frame) -> Self {
        Self {
            name: frame.command_name(),
            remote: matches!(
                frame,
                Frame::RemoteAtCommand { .. } | Frame::RemoteAtCommandResponse { .. }
            ),
        }
    }
}

struct Pending {
    callback: ResponseCallback,
    created: Instant,
}

type PendingTable = HashMap<PendingKey, VecDeque<Pending>>;

/// Tracks outstanding requests and routes each inbound response to the
/// caller that solicited it, exactly once.
///
/// Requests sharing a key resolve in FIFO order: the oldest outstanding
/// request matches the next response for that key.
pub struct CorrelationService {
    pending: Mutex<PendingTable>,
    transmit: TransmitFn,
}

impl CorrelationService {
    pub(crate) fn new(transmit: TransmitFn) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            transmit,
        }
    }

    /// Encode and transmit a request frame, registering `callback` to
    /// fire when the matching response arrives.
    ///
    /// Returns once the frame is on the wire; the callback fires later
    /// from the receive path, at most once. If transmission fails the
    /// registration is rolled back and the callback is dropped without
    /// being invoked.
    pub fn enqueue(&self, frame: &Frame, callback: ResponseCallback) -> Result<()> {
        debug_assert!(!frame.is_response(), "enqueue expects a request frame");

        let encoded = encode_to_bytes(frame)?;
        let key = PendingKey::for_frame(frame);
        self.lock_pending()
            .entry(key)
            .or_default()
            .push_back(Pending {
                callback,
                created: Instant::now(),
            });

        if let Err(err) = (self.transmit)(encoded) {
            let mut pending = self.lock_pending();
            if let Some(queue) = pending.get_mut(&key) {
                queue.pop_back();
                if queue.is_empty() {
                    pending.remove(&key);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Route an inbound frame to the matching pending request, if any.
    ///
    /// The table lock is released before the callback runs, so a callback
    /// may itself call [`enqueue`](Self::enqueue) without deadlocking.
    /// Non-response frames and unsolicited responses are ignored here.
    /// Returns `true` when a callback was invoked.
    pub fn on_received_frame(&self, frame: Frame) -> bool {
        if !frame.is_response() {
            return false;
        }

        let key = PendingKey::for_frame(&frame);
        let matched = {
            let mut pending = self.lock_pending();
            match pending.get_mut(&key) {
                Some(queue) => {
                    let entry = queue.pop_front();
                    if queue.is_empty() {
                        pending.remove(&key);
                    }
                    entry
                }
                None => None,
            }
        };

        match matched {
            Some(entry) => {
                tracing::trace!(
                    name = %key.name,
                    elapsed_ms = entry.created.elapsed().as_millis() as u64,
                    "response matched pending request"
                );
                (entry.callback)(frame);
                true
            }
            None => {
                tracing::debug!(name = %frame.command_name(), "unsolicited response ignored");
                false
            }
        }
    }

    /// Number of requests still waiting for a response.
    pub fn pending_len(&self) -> usize {
        self.lock_pending().values().map(VecDeque::len).sum()
    }

    /// Drop pending requests older than `age`, returning how many were
    /// removed. Dropped callbacks are never invoked.
    ///
    /// The base protocol never expires requests: a response that never
    /// arrives leaves its entry (and callback) alive indefinitely. This
    /// sweep is an opt-in escape hatch for callers that cannot accept
    /// that growth; nothing calls it automatically.
    pub fn expire_older_than(&self, age: Duration) -> usize {
        let mut removed = 0;
        self.lock_pending().retain(|_, queue| {
            let before = queue.len();
            queue.retain(|entry| entry.created.elapsed() < age);
            removed += before - queue.len();
            !queue.is_empty()
        });
        removed
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingTable> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CorrelationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationService")
            .field("pending", &self.pending_len())
            .finish()
    }
}

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use bytes::Bytes;
use rfprims_frame::{
    decode_frame, encode_to_bytes, is_valid, next_frame, ByteAccumulator, Frame, Scan,
};
use rfprims_serial::{SerialLink, TransportError};

use crate::correlation::{CorrelationService, ResponseCallback};
use crate::error::Result;
use crate::observer::LinkObserver;

/// What the receive path does with transport bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveMode {
    /// Read and discard. Keeps the driver's receive buffer from
    /// overflowing while no listener is ready to consume frames.
    Drain,
    /// Accumulate, slice, validate, decode and dispatch.
    Parse,
}

const MODE_DRAIN: u8 = 0;
const MODE_PARSE: u8 = 1;

const READ_CHUNK: usize = 256;

/// State shared between the coordinator handle and its reader thread.
struct Shared {
    mode: AtomicU8,
    stop: AtomicBool,
    observers: Mutex<Vec<Arc<dyn LinkObserver>>>,
}

impl Shared {
    fn mode(&self) -> ReceiveMode {
        match self.mode.load(Ordering::SeqCst) {
            MODE_PARSE => ReceiveMode::Parse,
            _ => ReceiveMode::Drain,
        }
    }

    // Snapshot so delivery never holds the registration lock; an observer
    // may register further observers without deadlocking.
    fn snapshot(&self) -> Vec<Arc<dyn LinkObserver>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn notify_bytes_read(&self, raw: &[u8]) {
        for observer in self.snapshot() {
            observer.bytes_read(raw);
        }
    }

    fn notify_unaligned(&self, raw: &[u8]) {
        for observer in self.snapshot() {
            observer.unaligned_bytes(raw);
        }
    }

    fn notify_frame_dropped(&self, raw: &[u8]) {
        for observer in self.snapshot() {
            observer.frame_dropped(raw);
        }
    }

    fn notify_frame_received(&self, frame: &Frame) {
        for observer in self.snapshot() {
            observer.frame_received(frame);
        }
    }

    fn notify_fault(&self, error: &TransportError) {
        for observer in self.snapshot() {
            observer.link_fault(error);
        }
    }
}

type WriterHalf = Arc<Mutex<Box<dyn SerialLink>>>;

fn write_encoded(writer: &WriterHalf, bytes: &[u8]) -> Result<()> {
    let mut link = writer.lock().unwrap_or_else(PoisonError::into_inner);
    link.write_all(bytes)?;
    // Synchronous write + flush: a slow device stalls the caller here.
    link.flush()?;
    Ok(())
}

/// Orchestrates one radio link: the inbound framing pipeline and the
/// outbound request path.
///
/// Construction spawns a reader thread that owns the read half of the
/// link and the byte accumulator. The thread starts in [`ReceiveMode::Drain`];
/// call [`start_listen`](Self::start_listen) once a consumer is ready.
/// [`send`](Self::send) and [`enqueue`](Self::enqueue) may be called from
/// any thread.
pub struct Coordinator {
    shared: Arc<Shared>,
    writer: WriterHalf,
    correlation: Arc<CorrelationService>,
    reader: Option<thread::JoinHandle<()>>,
}

impl Coordinator {
    /// Take ownership of a link and start its receive path.
    pub fn new(link: Box<dyn SerialLink>) -> Result<Self> {
        let writer: WriterHalf = Arc::new(Mutex::new(link.try_clone()?));
        let shared = Arc::new(Shared {
            mode: AtomicU8::new(MODE_DRAIN),
            stop: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
        });

        let transmit_writer = Arc::clone(&writer);
        let correlation = Arc::new(CorrelationService::new(Box::new(move |bytes: Bytes| {
            write_encoded(&transmit_writer, &bytes)
        })));

        let receiver = Receiver {
            link,
            accumulator: ByteAccumulator::new(),
            shared: Arc::clone(&shared),
            correlation: Arc::clone(&correlation),
        };
        let reader = thread::Builder::new()
            .name("rfprims-link-rx".to_string())
            .spawn(move || receiver.run())
            .map_err(TransportError::Io)?;

        Ok(Self {
            shared,
            writer,
            correlation,
            reader: Some(reader),
        })
    }

    /// Switch the receive path to accumulate-and-parse.
    pub fn start_listen(&self) {
        self.shared.mode.store(MODE_PARSE, Ordering::SeqCst);
        tracing::debug!("receive mode: parse");
    }

    /// Switch the receive path back to drain-and-discard.
    pub fn stop_listen(&self) {
        self.shared.mode.store(MODE_DRAIN, Ordering::SeqCst);
        tracing::debug!("receive mode: drain");
    }

    pub fn receive_mode(&self) -> ReceiveMode {
        self.shared.mode()
    }

    /// Register an observer for frames and link diagnostics. Delivery is
    /// synchronous on the receive path, in registration order.
    pub fn add_observer(&self, observer: Arc<dyn LinkObserver>) {
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Encode and transmit a frame: write followed by flush, blocking
    /// until both complete. No response tracking; use
    /// [`enqueue`](Self::enqueue) for request/response commands.
    pub fn send(&self, frame: &Frame) -> Result<()> {
        let encoded = encode_to_bytes(frame)?;
        write_encoded(&self.writer, &encoded)
    }

    /// Transmit a request and register `callback` for its response.
    /// See [`CorrelationService::enqueue`].
    pub fn enqueue(&self, frame: &Frame, callback: ResponseCallback) -> Result<()> {
        self.correlation.enqueue(frame, callback)
    }

    /// The correlation service, for pending-table introspection and the
    /// opt-in expiry sweep.
    pub fn correlation(&self) -> &CorrelationService {
        &self.correlation
    }

    /// Stop the receive path and join the reader thread.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The receive path. Owns the read half of the link and the accumulator;
/// nothing else ever touches either.
struct Receiver {
    link: Box<dyn SerialLink>,
    accumulator: ByteAccumulator,
    shared: Arc<Shared>,
    correlation: Arc<CorrelationService>,
}

impl Receiver {
    fn run(mut self) {
        let mut chunk = [0u8; READ_CHUNK];
        while !self.shared.stop.load(Ordering::SeqCst) {
            let want = match self.link.bytes_to_read() {
                Ok(n) => (n as usize).clamp(1, chunk.len()),
                Err(err) => return self.fault(err),
            };
            let read = match self.link.read(&mut chunk[..want]) {
                // Bounded read timed out with nothing available; loop to
                // observe the stop flag.
                Ok(0) => continue,
                Ok(n) => n,
                Err(err) => return self.fault(err),
            };
            self.on_bytes(&chunk[..read]);
        }
    }

    fn on_bytes(&mut self, bytes: &[u8]) {
        self.shared.notify_bytes_read(bytes);
        match self.shared.mode() {
            ReceiveMode::Drain => {}
            ReceiveMode::Parse => {
                self.accumulator.append(bytes);
                drain_buffered(&mut self.accumulator, &self.correlation, &self.shared);
            }
        }
    }

    fn fault(&self, err: TransportError) {
        tracing::error!("transport fault, receive path stopping: {err}");
        self.shared.notify_fault(&err);
    }
}

/// One pass of the receive pipeline: slice every complete frame currently
/// buffered, gate each on its checksum, decode and dispatch, then drop
/// the consumed prefix so only a trailing partial frame remains.
///
/// Protocol-level anomalies (junk bytes, checksum failures, unknown
/// types) are reported and consumed; none of them stops the pass.
fn drain_buffered(acc: &mut ByteAccumulator, correlation: &CorrelationService, shared: &Shared) {
    let mut offset = 0;
    loop {
        let buf = acc.as_slice();
        match next_frame(buf, offset) {
            Scan::Frame {
                skipped,
                start,
                end,
            } => {
                if skipped > 0 {
                    tracing::debug!(count = skipped, "unaligned bytes skipped");
                    shared.notify_unaligned(&buf[offset..start]);
                }
                let raw = &buf[start..end];
                if is_valid(raw) {
                    if let Some(frame) = decode_frame(raw) {
                        correlation.on_received_frame(frame.clone());
                        shared.notify_frame_received(&frame);
                    }
                } else {
                    tracing::warn!(len = raw.len(), "frame dropped by checksum");
                    shared.notify_frame_dropped(raw);
                }
                offset = end;
            }
            Scan::Incomplete { skipped } => {
                if skipped > 0 {
                    tracing::debug!(count = skipped, "unaligned bytes skipped");
                    shared.notify_unaligned(&buf[offset..offset + skipped]);
                    offset += skipped;
                }
                break;
            }
        }
    }
    acc.drop_prefix(offset);
}

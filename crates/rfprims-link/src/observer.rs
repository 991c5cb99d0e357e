use rfprims_frame::Frame;
use rfprims_serial::TransportError;

/// Receives link-level observations from a coordinator.
///
/// Every method defaults to a no-op; implement the ones you care about.
/// Delivery is synchronous on the receive path, in the order events were
/// produced, so implementations must not block for long.
pub trait LinkObserver: Send + Sync {
    /// A checksum-valid, recognized frame arrived.
    fn frame_received(&self, frame: &Frame) {
        let _ = frame;
    }

    /// A structurally complete frame failed its checksum and was dropped.
    /// `raw` is the full slice, delimiter through checksum byte.
    fn frame_dropped(&self, raw: &[u8]) {
        let _ = raw;
    }

    /// Raw bytes were read off the transport (diagnostic tap; fires in
    /// both receive modes).
    fn bytes_read(&self, raw: &[u8]) {
        let _ = raw;
    }

    /// Bytes that cannot belong to any frame were discarded while
    /// resynchronizing on the next delimiter.
    fn unaligned_bytes(&self, raw: &[u8]) {
        let _ = raw;
    }

    /// The transport reported a fault. The receive path has stopped; the
    /// owning process decides whether to reopen the link.
    fn link_fault(&self, error: &TransportError) {
        let _ = error;
    }
}

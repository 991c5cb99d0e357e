use crate::error::Result;

/// A connected byte-stream link to a radio module.
///
/// This is the transport contract consumed by the coordination layer.
/// It mirrors what a serial driver offers: a count of buffered unread
/// bytes, chunked reads, blocking writes and an explicit flush.
///
/// Implementations must honor two points of the contract:
///
/// - `read` must return within a bounded time. A return of `Ok(0)` means
///   the read timed out with nothing available, *not* end-of-stream.
///   The receive path relies on this to poll its stop flag.
/// - `try_clone` must produce an independent handle to the same device so
///   one half can feed a reader thread while the other serves writers.
pub trait SerialLink: Send {
    /// Number of bytes buffered by the driver and not yet read.
    fn bytes_to_read(&self) -> Result<u32>;

    /// Read up to `buf.len()` bytes into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write the entire buffer to the device.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush driver buffers so written bytes reach the wire.
    fn flush(&mut self) -> Result<()>;

    /// Clone the link, creating a new handle to the same device.
    fn try_clone(&self) -> Result<Box<dyn SerialLink>>;
}

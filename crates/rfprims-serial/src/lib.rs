//! Serial byte-stream transport abstraction for radio module links.
//!
//! Provides the transport contract the framing layer builds on: an opaque
//! byte stream with a byte-availability probe, chunked reads, blocking
//! writes and an explicit flush. The framing and coordination layers never
//! touch a device directly; they only see [`SerialLink`].
//!
//! This is the lowest layer of rfprims. The one concrete implementation,
//! [`TtyLink`], wraps a local serial device (UART).

pub mod error;
pub mod traits;
pub mod tty;

pub use error::{Result, TransportError};
pub use traits::SerialLink;
pub use tty::{TtyLink, DEFAULT_BAUD_RATE};

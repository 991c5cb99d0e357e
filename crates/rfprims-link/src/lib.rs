//! Request/response coordination over a framed radio module link.
//!
//! This is the "just works" layer. Open a serial link, hand it to a
//! [`Coordinator`], enqueue AT command requests with a callback each, and
//! observe decoded frames and link diagnostics through [`LinkObserver`].
//!
//! The coordinator runs one reader thread per link. Until
//! [`Coordinator::start_listen`] is called, incoming bytes are drained
//! and discarded so the driver's receive buffer cannot overflow while no
//! one is ready to consume frames.

pub mod coordinator;
pub mod correlation;
pub mod error;
pub mod observer;

pub use coordinator::{Coordinator, ReceiveMode};
pub use correlation::{CorrelationService, ResponseCallback};
pub use error::{LinkError, Result};
pub use observer::LinkObserver;

//! Radio link primitives for XBee-class transceiver modules.
//!
//! rfprims implements the API-mode framing protocol spoken over a serial
//! link: delimited, checksummed frames, boundary detection over an
//! arbitrarily chunked byte stream, and request/response correlation.
//!
//! # Crate Structure
//!
//! - [`serial`] — Low-level serial transport abstraction
//! - [`frame`] — Delimited, checksummed AT-command framing
//! - [`link`] — Request/response coordination over a framed link

/// Re-export serial transport types.
pub mod serial {
    pub use rfprims_serial::*;
}

/// Re-export framing types.
pub mod frame {
    pub use rfprims_frame::*;
}

/// Re-export link coordination types.
pub mod link {
    pub use rfprims_link::*;
}

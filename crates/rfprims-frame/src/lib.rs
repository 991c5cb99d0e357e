//! Delimited, checksummed AT-command framing for radio module links.
//!
//! This is the core value-add layer of rfprims. Every message on the
//! serial link is framed with:
//! - A fixed start delimiter (`0x7E`) for stream synchronization
//! - A 2-byte big-endian length counting the bytes between the length
//!   field and the checksum
//! - A frame-type tag selecting one of four AT-command shapes
//! - A single-byte complement checksum over everything after the length
//!
//! No partial reads, no buffer management in user code: append transport
//! bytes to a [`ByteAccumulator`], drain complete frames with
//! [`next_frame`], gate them with [`is_valid`] and decode with
//! [`decode_frame`].

pub mod accumulator;
pub mod builder;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod frame;
pub mod slicer;

pub use accumulator::ByteAccumulator;
pub use builder::FrameBuilder;
pub use checksum::{checksum, is_valid};
pub use codec::{decode_frame, encode_frame, encode_to_bytes, FRAME_OVERHEAD};
pub use error::{FrameError, Result};
pub use frame::{
    frame_type_name, options, CommandName, CommandStatus, Frame, AT_COMMAND, AT_COMMAND_RESPONSE,
    BROADCAST_ADDRESS_16, BROADCAST_ADDRESS_64, REMOTE_AT_COMMAND, REMOTE_AT_COMMAND_RESPONSE,
    START_DELIMITER,
};
pub use slicer::{next_frame, Scan};

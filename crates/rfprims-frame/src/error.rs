/// Errors that can occur while building or encoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The builder was asked to produce a frame without the mandatory
    /// command name.
    #[error("missing command name for frame type 0x{frame_type:02X}")]
    MissingCommandName { frame_type: u8 },

    /// Command names are exactly two ASCII characters.
    #[error("invalid command name {name:?} (expected exactly 2 bytes)")]
    InvalidCommandName { name: String },

    /// The command data exceeds what the 16-bit length field can carry.
    #[error("command data too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

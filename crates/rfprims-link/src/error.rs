/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rfprims_serial::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rfprims_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, LinkError>;

use std::path::PathBuf;

/// Errors that can occur in serial transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// An I/O error occurred on the link.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A device-level fault reported by the serial driver.
    #[error("serial device fault: {0}")]
    Device(#[from] serialport::Error),

    /// The link has been closed.
    #[error("link closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;

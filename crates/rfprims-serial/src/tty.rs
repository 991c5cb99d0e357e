use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Duration;

use serialport::SerialPort;

use crate::error::{Result, TransportError};
use crate::traits::SerialLink;

/// Default line rate for XBee-class modules.
pub const DEFAULT_BAUD_RATE: u32 = 9_600;

/// Read timeout applied to the device. Keeps reads bounded so the receive
/// path can observe its stop flag between reads.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// A serial device link (`/dev/tty*` on Unix, `COM*` on Windows).
pub struct TtyLink {
    inner: Box<dyn SerialPort>,
}

impl TtyLink {
    /// Open a serial device in 8N1 mode at the given baud rate.
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        let inner = serialport::new(path.to_string_lossy(), baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), baud_rate, "serial device opened");
        Ok(Self { inner })
    }

    /// The device name reported by the driver, if any.
    pub fn name(&self) -> Option<String> {
        self.inner.name()
    }
}

impl SerialLink for TtyLink {
    fn bytes_to_read(&self) -> Result<u32> {
        self.inner.bytes_to_read().map_err(TransportError::Device)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => Ok(n),
            // Timed-out reads surface as Ok(0) per the SerialLink contract.
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(0),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(0),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf).map_err(TransportError::Io)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(TransportError::Io)
    }

    fn try_clone(&self) -> Result<Box<dyn SerialLink>> {
        let cloned = self.inner.try_clone().map_err(TransportError::Device)?;
        Ok(Box::new(TtyLink { inner: cloned }))
    }
}

impl std::fmt::Debug for TtyLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyLink")
            .field("port", &self.inner.name())
            .finish()
    }
}

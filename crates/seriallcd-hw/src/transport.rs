//! Byte transports the display can be driven over.

use crate::{Error, Result};
use std::io;
use std::time::Duration;
use tokio_serial::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info};

/// Write timeout for the serial port.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// A send-only byte channel to the display.
pub trait Transport {
    /// Writes all bytes, returning once they have been handed to the line.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reports the configured baud rate, if the transport knows it.
    fn baud_rate(&self) -> Option<u32> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn baud_rate(&self) -> Option<u32> {
        (**self).baud_rate()
    }
}

/// In-memory sink; collects everything written to it.
impl Transport for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Serial port transport (8N1).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    port_path: String,
    baud_rate: u32,
}

impl SerialTransport {
    /// Opens and configures the serial port.
    pub fn open(port_path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(port_path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| {
                if let tokio_serial::ErrorKind::Io(kind) = &e.kind {
                    if (*kind == io::ErrorKind::NotFound
                        || *kind == io::ErrorKind::PermissionDenied)
                        && !std::path::Path::new(port_path).exists()
                    {
                        return Error::PortNotFound(port_path.to_string());
                    }
                }
                Error::Serial(e)
            })?;

        info!("Serial port {} opened at {} baud", port_path, baud_rate);

        Ok(Self {
            port,
            port_path: port_path.to_string(),
            baud_rate,
        })
    }

    /// Returns the port path.
    pub fn port_path(&self) -> &str {
        &self.port_path
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, bytes)?;
        io::Write::flush(&mut self.port)?;
        debug!("Wrote {} bytes to {}", bytes.len(), self.port_path);
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        // Prefer what the driver reports; some adapters round the requested rate.
        Some(self.port.baud_rate().unwrap_or(self.baud_rate))
    }
}

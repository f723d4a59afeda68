//! Byte-level channel to the modem
//!
//! [`ByteChannel`] is the transport's only I/O dependency: a duplex byte
//! stream with bounded reads. [`SerialChannel`] is the production
//! implementation over a serial port; tests substitute scripted channels.

use std::fmt;
use std::io::{self, Read, Write};

use serialport::SerialPort;

use crate::config::AtConfig;
use crate::error::AtError;

/// Duplex byte stream with bounded-timeout reads
///
/// `read_chunk` returns `Ok(0)` when the per-read timeout elapses without
/// data or the stream ends; the caller owns any overall deadline.
pub trait ByteChannel: Send + fmt::Debug {
    /// Read up to `buf.len()` bytes, returning how many arrived
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, AtError>;

    /// Write the whole buffer and flush it to the device
    fn write_all(&mut self, buf: &[u8]) -> Result<(), AtError>;
}

/// [`ByteChannel`] over a serial port
pub struct SerialChannel {
    device: String,
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Open `device` with the baud rate and read timeout from `config`
    pub fn open(device: &str, config: &AtConfig) -> Result<Self, AtError> {
        let port = serialport::new(device, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| AtError::Connection {
                device: device.to_owned(),
                source,
            })?;

        Ok(Self {
            device: device.to_owned(),
            port,
        })
    }

    /// Path the channel was opened with
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialChannel")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl ByteChannel for SerialChannel {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, AtError> {
        match self.port.read(buf) {
            Ok(read) => Ok(read),
            // The port surfaces an elapsed read timeout as an error; the
            // channel contract reports it as an empty read instead.
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(err) => Err(AtError::Io(err)),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), AtError> {
        self.port.write_all(buf)?;
        self.port.flush()?;
        Ok(())
    }
}

//! Error types for the AT command transport

use simlink_apdu_core::{StatusWord, TransportError};

/// AT transport specific errors
#[derive(Debug, thiserror::Error)]
pub enum AtError {
    /// Serial device could not be opened
    #[error("Failed to open {device}: {source}")]
    Connection {
        /// Device path that was attempted
        device: String,
        /// Underlying serial port error
        source: serialport::Error,
    },

    /// I/O failure on an open serial channel
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Modem does not implement a required AT command
    #[error("Device missing {0} support")]
    CapabilityMissing(&'static str),

    /// Modem reported ERROR or violated the response protocol
    #[error("Protocol error: {0}")]
    Protocol(&'static str),

    /// Tagged response line was present but could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(&'static str),

    /// Hex payload in a tagged response failed to decode
    #[error("Invalid hex in response: {0}")]
    Hex(#[from] hex::FromHexError),

    /// APDU exceeds what the configured dialect can carry
    #[error("APDU of {0} bytes exceeds the dialect transmit limit")]
    ApduTooLong(usize),

    /// No logical channel is open
    #[error("No logical channel open")]
    NoChannel,

    /// An earlier channel open failed and is not retried implicitly
    #[error("Logical channel is in failed state")]
    ChannelFailed,

    /// Channel open sequence completed with a non-success status
    #[error("Channel open rejected with status {0}")]
    ChannelOpenFailed(StatusWord),

    /// Modem did not produce a terminal response in time
    #[error("Timed out waiting for modem response")]
    Timeout,
}

impl From<AtError> for TransportError {
    fn from(err: AtError) -> Self {
        match err {
            AtError::Connection { .. } => Self::Connection,
            AtError::Io(_) => Self::Transmission,
            AtError::Protocol(_) => Self::Device,
            AtError::ChannelOpenFailed(status) => Self::StatusWord(status.to_u16()),
            AtError::Timeout => Self::Timeout,
            other => Self::Other(other.to_string()),
        }
    }
}

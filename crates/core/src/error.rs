//! Core error type for APDU operations
//!
//! All error variants are consolidated here to simplify error handling and
//! facilitate error bubbling up through the call stack.

use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Result type alias for APDU operations
pub type Result<T> = core::result::Result<T, Error>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Parse error when processing a response
    #[error("Parse error: {0}")]
    Parse(&'static str),

    /// Status error from a response
    #[error("Status error {status}, message: {message:?}")]
    Status {
        /// Status word that caused the error
        status: StatusWord,
        /// Optional error message
        message: Option<&'static str>,
    },
}

impl Error {
    /// Create a new parse error
    pub const fn parse(message: &'static str) -> Self {
        Self::Parse(message)
    }

    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status {
            status: StatusWord::new(sw1, sw2),
            message: None,
        }
    }

    /// Create a new status error with a message
    pub const fn status_with_message(sw1: u8, sw2: u8, message: &'static str) -> Self {
        Self::Status {
            status: StatusWord::new(sw1, sw2),
            message: Some(message),
        }
    }
}

//! Configuration options for the AT command transport

use std::time::Duration;

use crate::dialect::Dialect;

/// Configuration options for an AT transport session
#[derive(Debug, Clone)]
pub struct AtConfig {
    /// AT dialect used to tunnel APDUs
    pub dialect: Dialect,

    /// Serial line speed in baud
    pub baud_rate: u32,

    /// How long a single read may wait for bytes before surfacing empty
    pub read_timeout: Duration,

    /// Overall deadline for one command/response exchange
    pub response_timeout: Duration,

    /// Maximum GET RESPONSE rounds drained per channel open
    pub max_get_response: usize,
}

impl Default for AtConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            baud_rate: 115_200,
            read_timeout: Duration::from_millis(100),
            response_timeout: Duration::from_secs(10),
            max_get_response: 10,
        }
    }
}

impl AtConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the serial baud rate
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the per-read timeout
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the whole-response deadline
    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the GET RESPONSE continuation cap
    pub const fn with_max_get_response(mut self, rounds: usize) -> Self {
        self.max_get_response = rounds;
        self
    }
}

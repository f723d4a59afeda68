//! Device manager for modem serial ports

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::AtConfig;
use crate::device::SerialDevice;
use crate::error::AtError;
use crate::port::SerialChannel;
use crate::transport::AtTransport;

/// Directory of stable serial device links on Linux
const SERIAL_BY_ID: &str = "/dev/serial/by-id";

/// Manager for discovering and opening modem serial devices
#[derive(Debug, Clone)]
pub struct AtDeviceManager {
    search_path: PathBuf,
}

impl Default for AtDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AtDeviceManager {
    /// Create a manager scanning the default `/dev/serial/by-id` directory
    pub fn new() -> Self {
        Self {
            search_path: PathBuf::from(SERIAL_BY_ID),
        }
    }

    /// Create a manager scanning a custom directory
    pub fn with_search_path(path: impl Into<PathBuf>) -> Self {
        Self {
            search_path: path.into(),
        }
    }

    /// List candidate serial devices, sorted by name
    ///
    /// A missing or unreadable directory yields an empty list rather than an
    /// error: hosts without the by-id tree simply have nothing to report.
    pub fn list_devices(&self) -> Vec<SerialDevice> {
        let Ok(entries) = fs::read_dir(&self.search_path) else {
            debug!(path = %self.search_path.display(), "device directory not readable");
            return Vec::new();
        };

        let mut devices: Vec<SerialDevice> = entries
            .flatten()
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let locator = entry.path().display().to_string();
                SerialDevice::new(name, locator)
            })
            .collect();
        devices.sort_by(|a, b| a.name().cmp(b.name()));
        devices
    }

    /// Open a transport on `locator` with default configuration
    pub fn open_device(&self, locator: &str) -> Result<AtTransport<SerialChannel>, AtError> {
        self.open_device_with_config(locator, AtConfig::default())
    }

    /// Open a transport on `locator` with custom configuration
    pub fn open_device_with_config(
        &self,
        locator: &str,
        config: AtConfig,
    ) -> Result<AtTransport<SerialChannel>, AtError> {
        AtTransport::open(locator, config)
    }
}

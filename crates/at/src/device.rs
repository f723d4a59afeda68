//! Serial device representation for enumeration results

use serde::Serialize;

/// A serial device discovered during enumeration
///
/// `name` is the human-oriented identifier (on Linux the stable entry name
/// under `/dev/serial/by-id`); `locator` is the path handed to
/// [`AtTransport::open`](crate::AtTransport::open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialDevice {
    name: String,
    locator: String,
}

impl SerialDevice {
    /// Create a new device record
    pub const fn new(name: String, locator: String) -> Self {
        Self { name, locator }
    }

    /// Human-oriented device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path used to open the device
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_name_and_locator() {
        let device = SerialDevice::new(
            "usb-Quectel_EG25_G-if02-port0".to_owned(),
            "/dev/serial/by-id/usb-Quectel_EG25_G-if02-port0".to_owned(),
        );

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(
            value["name"].as_str().unwrap(),
            "usb-Quectel_EG25_G-if02-port0"
        );
        assert_eq!(
            value["locator"].as_str().unwrap(),
            "/dev/serial/by-id/usb-Quectel_EG25_G-if02-port0"
        );
    }
}

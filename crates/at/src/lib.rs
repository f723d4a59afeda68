//! AT modem transport for APDU exchanges
//!
//! This crate tunnels ISO/IEC 7816 APDUs to a SIM or eUICC through a cellular
//! modem attached over a serial line, using the 3GPP TS 27.007 generic SIM
//! access commands. It implements the
//! [`CardTransport`](simlink_apdu_core::CardTransport) trait from
//! [`simlink_apdu_core`] on top of two modem dialects:
//!
//! - [`Dialect::Csim`]: everything over `AT+CSIM`, with channel management done
//!   in-band through MANAGE CHANNEL APDUs.
//! - [`Dialect::Cgla`]: dedicated channel commands (`AT+CCHO`, `AT+CCHC`) plus
//!   `AT+CGLA` for the exchanges themselves.
//!
//! # Example
//!
//! ```no_run
//! use simlink_transport_at::{AtConfig, AtTransport, Dialect, ISD_R_AID};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AtConfig::new().with_dialect(Dialect::Csim);
//! let mut transport = AtTransport::open("/dev/ttyUSB0", config)?;
//!
//! let channel = transport.open_channel(&ISD_R_AID)?;
//! println!("logical channel {channel} open");
//!
//! let response = transport.transmit(&[0x81, 0xE2, 0x91, 0x00, 0x03, 0xBF, 0x20, 0x00])?;
//! println!("{}", hex::encode_upper(&response));
//!
//! transport.close_channel();
//! transport.disconnect();
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod channel;
mod config;
mod device;
mod dialect;
mod error;
mod manager;
mod port;
mod tokenizer;
mod transport;

pub use channel::ChannelState;
pub use config::AtConfig;
pub use device::SerialDevice;
pub use dialect::{Dialect, ParseDialectError};
pub use error::AtError;
pub use manager::AtDeviceManager;
pub use port::{ByteChannel, SerialChannel};
pub use transport::AtTransport;

/// AID of the ISD-R, the root security domain present on every eUICC
///
/// Selecting this application is the usual first step of any profile
/// management session.
pub const ISD_R_AID: [u8; 16] = [
    0xA0, 0x00, 0x00, 0x05, 0x59, 0x10, 0x10, 0xFF, 0xFF, 0xFF, 0xFF, 0x89, 0x00, 0x00, 0x01, 0x00,
];

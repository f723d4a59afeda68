//! Subcommand implementations

use std::error::Error;

use simlink_apdu_core::Response;
use simlink_transport_at::{AtConfig, AtDeviceManager, AtTransport, Dialect, ISD_R_AID};
use tracing::info;

/// List available serial devices as JSON records
pub fn list_devices() -> Result<(), Box<dyn Error>> {
    let manager = AtDeviceManager::new();
    let devices = manager.list_devices();
    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}

/// Connect to the device and run the capability probe
pub fn probe(device: &str, dialect: Dialect) -> Result<(), Box<dyn Error>> {
    let config = AtConfig::new().with_dialect(dialect);
    let transport = AtTransport::open(device, config)?;

    println!("{device}: {dialect} dialect supported");
    transport.disconnect();
    Ok(())
}

/// Open a logical channel and exchange raw APDUs
pub fn transmit(
    device: &str,
    dialect: Dialect,
    aid: Option<&str>,
    apdus: &[String],
) -> Result<(), Box<dyn Error>> {
    let aid = match aid {
        Some(aid) => hex::decode(aid)?,
        None => ISD_R_AID.to_vec(),
    };

    let config = AtConfig::new().with_dialect(dialect);
    let mut transport = AtTransport::open(device, config)?;

    let channel = transport.open_channel(&aid)?;
    info!("Logical channel {channel} open on {device}");

    for apdu in apdus {
        let tx = hex::decode(apdu)?;
        println!("=> {}", hex::encode_upper(&tx));

        let rx = transport.transmit(&tx)?;
        let response = Response::from_bytes(&rx)?;
        let status = response.status();
        match response.payload() {
            Some(payload) => println!(
                "<= {} [{status}: {}]",
                hex::encode_upper(payload),
                status.description()
            ),
            None => println!("<= [{status}: {}]", status.description()),
        }
    }

    transport.close_channel();
    transport.disconnect();
    Ok(())
}

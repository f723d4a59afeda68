//! Wire encoding for the two AT tunneling dialects
//!
//! Both dialects carry APDUs as uppercase hex without separators, framed in
//! the 3GPP TS 27.007 commands for (e)UICC access:
//!
//! - [`Dialect::Csim`] uses the generic SIM access command `AT+CSIM` for
//!   every exchange, channel management included.
//! - [`Dialect::Cgla`] splits the work across `AT+CCHO` (open channel by
//!   AID), `AT+CCHC` (close channel) and `AT+CGLA` (transmit on channel).
//!
//! The length argument of the transmit commands counts hex characters, so it
//! is always twice the APDU byte length.

use std::fmt;
use std::str::FromStr;

/// Largest APDU `AT+CGLA` accepts; longer commands need command chaining,
/// which the modems this targets do not implement.
pub(crate) const CGLA_MAX_APDU_LEN: usize = 265;

/// Tag prefixing the data line of an `AT+CCHO` response
pub(crate) const CHANNEL_OPEN_TAG: &str = "+CCHO: ";

/// AT command scheme used to tunnel APDUs through the modem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Single-command scheme: `AT+CSIM` carries every exchange
    #[default]
    Csim,
    /// Three-command scheme: `AT+CCHO`/`AT+CCHC` manage the logical channel,
    /// `AT+CGLA` transmits on it
    Cgla,
}

impl Dialect {
    /// Commands probed with `<CMD>=?` before a session becomes usable
    pub(crate) const fn probe_commands(&self) -> &'static [&'static str] {
        match self {
            Self::Csim => &["AT+CSIM"],
            Self::Cgla => &["AT+CCHO", "AT+CCHC", "AT+CGLA"],
        }
    }

    /// Prefix tagging the data line of a transmit response
    ///
    /// Some firmwares omit the space after `+CGLA:`, so that tag does not
    /// include one; the remainder is parsed leniently either way.
    pub(crate) const fn response_tag(&self) -> &'static str {
        match self {
            Self::Csim => "+CSIM: ",
            Self::Cgla => "+CGLA:",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csim => write!(f, "csim"),
            Self::Cgla => write!(f, "cgla"),
        }
    }
}

/// Error returned when parsing a [`Dialect`] from a string fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect {0:?} (expected \"csim\" or \"cgla\")")]
pub struct ParseDialectError(String);

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("csim") {
            Ok(Self::Csim)
        } else if s.eq_ignore_ascii_case("cgla") {
            Ok(Self::Cgla)
        } else {
            Err(ParseDialectError(s.to_owned()))
        }
    }
}

/// Build the capability probe for `command`
pub(crate) fn probe(command: &str) -> String {
    format!("{command}=?\r\n")
}

/// Build `AT+CSIM=<2N>,"<hex>"` for an APDU of N bytes
pub(crate) fn csim_transmit(apdu: &[u8]) -> String {
    format!("AT+CSIM={},\"{}\"\r\n", apdu.len() * 2, hex::encode_upper(apdu))
}

/// Build `AT+CGLA=<channel>,<2N>,"<hex>"` for an APDU of N bytes
pub(crate) fn cgla_transmit(channel: u8, apdu: &[u8]) -> String {
    format!(
        "AT+CGLA={},{},\"{}\"\r\n",
        channel,
        apdu.len() * 2,
        hex::encode_upper(apdu)
    )
}

/// Build `AT+CCHO="<hex AID>"`
pub(crate) fn channel_open(aid: &[u8]) -> String {
    format!("AT+CCHO=\"{}\"\r\n", hex::encode_upper(aid))
}

/// Build `AT+CCHC=<channel>`
pub(crate) fn channel_close(channel: u8) -> String {
    format!("AT+CCHC={channel}\r\n")
}

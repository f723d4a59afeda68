//! AT command transport implementation
//!
//! One [`AtTransport`] owns one modem session: the serial byte channel, the
//! response scanner and the logical channel state all live and die with it.

use std::time::Instant;

use simlink_apdu_core::prelude::*;
use tracing::{debug, instrument, trace, warn};

use crate::channel::ChannelState;
use crate::config::AtConfig;
use crate::dialect::{self, Dialect};
use crate::error::AtError;
use crate::port::{ByteChannel, SerialChannel};
use crate::tokenizer::{LineScanner, Outcome, classify};

/// Logical channel id hard-assigned by the MANAGE CHANNEL open flow
const MANAGE_CHANNEL_ID: u8 = 1;

/// Bounded number of reads used to drain stale bytes after connecting
const DRAIN_ATTEMPTS: usize = 50;

/// APDU transport tunneling exchanges through modem AT commands
///
/// The session is usable for APDU traffic once a logical channel has been
/// established with [`Self::open_channel`]. All exchanges are synchronous;
/// responses are bounded by [`AtConfig::response_timeout`].
#[derive(Debug)]
pub struct AtTransport<C: ByteChannel = SerialChannel> {
    channel: C,
    config: AtConfig,
    state: ChannelState,
    scanner: LineScanner,
}

impl AtTransport<SerialChannel> {
    /// Open the serial device and prepare a session on it
    ///
    /// Drains whatever the modem buffered before we attached, then probes
    /// the dialect's commands with `<CMD>=?`; a modem rejecting one fails
    /// with [`AtError::CapabilityMissing`]. The logical channel starts
    /// closed.
    pub fn open(device: &str, config: AtConfig) -> Result<Self, AtError> {
        let channel = SerialChannel::open(device, &config)?;
        debug!(device, dialect = %config.dialect, "serial channel open");
        Self::with_channel(channel, config)
    }
}

impl<C: ByteChannel> AtTransport<C> {
    /// Prepare a session over an already-open byte channel
    pub fn with_channel(channel: C, config: AtConfig) -> Result<Self, AtError> {
        let mut transport = Self {
            channel,
            config,
            state: ChannelState::Closed,
            scanner: LineScanner::new(),
        };
        transport.drain_stale();
        transport.probe_capabilities()?;
        Ok(transport)
    }

    /// Currently configured options
    pub const fn config(&self) -> &AtConfig {
        &self.config
    }

    /// Current logical channel state
    pub const fn channel_state(&self) -> ChannelState {
        self.state
    }

    /// Exchange one APDU, returning the raw response (body plus status word)
    ///
    /// Requires an established logical channel. Status words come back
    /// untouched, `61xx` included: continuation is the caller's business
    /// here, only the channel open flow drains it internally.
    pub fn transmit(&mut self, apdu: &[u8]) -> Result<Bytes, AtError> {
        let command = self.encode_transmit(apdu)?;
        self.write_command(&command)?;

        let tag = self.config.dialect.response_tag();
        let body = self
            .expect(Some(tag))?
            .ok_or(AtError::Protocol("transmit response carried no data line"))?;
        parse_tagged_body(&body)
    }

    /// Open the card logical channel by selecting `aid`, returning its id
    ///
    /// Opening is idempotent while the channel is open: the established id
    /// comes back without any wire traffic. A failed attempt parks the
    /// channel in [`ChannelState::Failed`] and is not retried implicitly.
    #[instrument(level = "debug", skip(self, aid), fields(dialect = %self.config.dialect))]
    pub fn open_channel(&mut self, aid: &[u8]) -> Result<u8, AtError> {
        match self.state {
            ChannelState::Open(id) => return Ok(id),
            ChannelState::Failed => return Err(AtError::ChannelFailed),
            ChannelState::Closed => {}
        }

        match self.config.dialect {
            Dialect::Csim => self.open_channel_managed(aid),
            Dialect::Cgla => self.open_channel_numbered(aid),
        }
    }

    /// Close the logical channel, best-effort
    ///
    /// The three-command dialect issues `AT+CCHC` for an open channel and
    /// ignores every outcome, errors included. The state always returns to
    /// closed, so a later [`Self::open_channel`] starts fresh.
    pub fn close_channel(&mut self) {
        if self.config.dialect == Dialect::Cgla {
            if let ChannelState::Open(id) = self.state {
                debug!(channel = id, "closing logical channel");
                if self.write_command(&dialect::channel_close(id)).is_ok() {
                    let _ = self.expect(None);
                }
            }
        }
        self.state = ChannelState::Closed;
    }

    /// End the session, closing the underlying byte channel
    ///
    /// Card-side teardown is not implied; call [`Self::close_channel`]
    /// first where it matters.
    pub fn disconnect(self) {
        debug!("disconnecting");
    }

    /// Encode `apdu` for the configured dialect, enforcing the channel gate.
    fn encode_transmit(&self, apdu: &[u8]) -> Result<String, AtError> {
        match self.config.dialect {
            // Only Closed blocks the single-command path; Open and Failed
            // both carry an assigned channel.
            Dialect::Csim => match self.state {
                ChannelState::Closed => Err(AtError::NoChannel),
                ChannelState::Open(_) | ChannelState::Failed => Ok(dialect::csim_transmit(apdu)),
            },
            Dialect::Cgla => match self.state {
                ChannelState::Closed => Err(AtError::NoChannel),
                ChannelState::Failed => Err(AtError::ChannelFailed),
                ChannelState::Open(id) => {
                    if apdu.len() > dialect::CGLA_MAX_APDU_LEN {
                        return Err(AtError::ApduTooLong(apdu.len()));
                    }
                    Ok(dialect::cgla_transmit(id, apdu))
                }
            },
        }
    }

    /// Verify the modem implements every command the dialect needs.
    fn probe_capabilities(&mut self) -> Result<(), AtError> {
        for &command in self.config.dialect.probe_commands() {
            self.write_command(&dialect::probe(command))?;
            match self.expect(None) {
                Ok(_) => trace!(command, "capability present"),
                Err(AtError::Protocol(_)) => return Err(AtError::CapabilityMissing(command)),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Read and discard whatever the modem queued before we attached.
    fn drain_stale(&mut self) {
        let mut scratch = [0u8; 64];
        let mut discarded = 0usize;
        for _ in 0..DRAIN_ATTEMPTS {
            match self.channel.read_chunk(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(read) => discarded += read,
            }
        }
        if discarded > 0 {
            trace!(discarded, "drained stale bytes");
        }
        self.scanner.clear();
    }

    fn write_command(&mut self, command: &str) -> Result<(), AtError> {
        // A fresh command invalidates any partial line still buffered.
        self.scanner.clear();
        trace!(command = command.trim_end(), "sending AT command");
        self.channel.write_all(command.as_bytes())
    }

    /// Drive reads until a terminal outcome, returning the last data line
    /// captured before `OK`, if any.
    fn expect(&mut self, expected: Option<&str>) -> Result<Option<String>, AtError> {
        let deadline = Instant::now() + self.config.response_timeout;
        let mut captured = None;
        let mut chunk = [0u8; 256];

        loop {
            let read = self.channel.read_chunk(&mut chunk)?;
            if read > 0 {
                self.scanner.extend(&chunk[..read]);
                while let Some(line) = self.scanner.next_line() {
                    trace!(line = %line, "modem line");
                    match classify(&line, expected) {
                        Outcome::Ok => return Ok(captured),
                        Outcome::Error => return Err(AtError::Protocol("device reported ERROR")),
                        // Later data lines supersede earlier ones
                        Outcome::Data(data) => captured = Some(data),
                        Outcome::Noise => {}
                    }
                }
            }
            if Instant::now() >= deadline {
                warn!(timeout = ?self.config.response_timeout, "modem response timed out");
                return Err(AtError::Timeout);
            }
        }
    }

    /// Transmit a structured command and parse the APDU response.
    fn exchange(&mut self, command: &Command) -> Result<Response, AtError> {
        let rx = self.transmit(&command.to_bytes())?;
        Response::from_bytes(&rx)
            .map_err(|_| AtError::MalformedResponse("response shorter than a status word"))
    }

    /// Channel open for the single-command dialect.
    ///
    /// The modem multiplexes everything over `AT+CSIM`, so the channel id is
    /// asserted up front and the card is asked to mirror it: MANAGE CHANNEL
    /// requests channel 1, then the application is selected on it.
    fn open_channel_managed(&mut self, aid: &[u8]) -> Result<u8, AtError> {
        // The exchanges below run through the ordinary transmit gate, which
        // requires an assigned channel.
        self.state = ChannelState::Open(MANAGE_CHANNEL_ID);

        let manage_open = Command::new_with_le(0x00, 0x70, 0x00, 0x00, 0x01);
        match self.exchange(&manage_open) {
            Ok(response) => debug!(status = %response.status(), "MANAGE CHANNEL answered"),
            Err(err) => debug!(%err, "MANAGE CHANNEL open failed, continuing"),
        }

        let select =
            Command::new_with_data(MANAGE_CHANNEL_ID, 0xA4, 0x04, 0x00, Bytes::copy_from_slice(aid));
        let response = match self.select_with_continuation(&select) {
            Ok(response) => response,
            Err(err) => return self.fail_open(err),
        };

        if response.is_success() {
            debug!(channel = MANAGE_CHANNEL_ID, "logical channel open");
            Ok(MANAGE_CHANNEL_ID)
        } else {
            self.fail_open(AtError::ChannelOpenFailed(response.status()))
        }
    }

    /// Run SELECT and drain `61xx` continuations through GET RESPONSE on the
    /// same channel, concatenating the response bodies. Bounded by
    /// [`AtConfig::max_get_response`].
    fn select_with_continuation(&mut self, select: &Command) -> Result<Response, AtError> {
        let channel = select.cla;
        let mut response = self.exchange(select)?;
        let mut body = BytesMut::new();
        if let Some(payload) = response.payload() {
            body.extend_from_slice(payload);
        }

        let mut rounds = 0usize;
        while let Some(remaining) = response.status().remaining_bytes() {
            if rounds >= self.config.max_get_response {
                warn!(rounds, "GET RESPONSE continuation cap exhausted");
                return Err(AtError::Timeout);
            }
            let get_response = Command::new_with_le(channel, 0xC0, 0x00, 0x00, remaining);
            response = self.exchange(&get_response)?;
            if let Some(payload) = response.payload() {
                body.extend_from_slice(payload);
            }
            rounds += 1;
        }

        debug!(
            status = %response.status(),
            body = %hex::encode_upper(&body),
            "select complete"
        );
        Ok(Response::new(
            (!body.is_empty()).then(|| body.freeze()),
            response.status(),
        ))
    }

    /// Channel open for the three-command dialect: the card assigns the id.
    fn open_channel_numbered(&mut self, aid: &[u8]) -> Result<u8, AtError> {
        // Best-effort close of channels a previous session may have leaked.
        for stale in 1..=4 {
            if self.write_command(&dialect::channel_close(stale)).is_ok() {
                let _ = self.expect(None);
            }
        }

        self.write_command(&dialect::channel_open(aid))?;
        let body = match self.expect(Some(dialect::CHANNEL_OPEN_TAG)) {
            Ok(Some(body)) => body,
            Ok(None) => {
                return self.fail_open(AtError::Protocol("channel open response carried no tag"));
            }
            Err(err) => return self.fail_open(err),
        };

        match body.trim().parse::<u8>() {
            Ok(id) if id > 0 => {
                self.state = ChannelState::Open(id);
                debug!(channel = id, "logical channel open");
                Ok(id)
            }
            _ => self.fail_open(AtError::MalformedResponse(
                "channel id is not a positive integer",
            )),
        }
    }

    fn fail_open(&mut self, err: AtError) -> Result<u8, AtError> {
        self.state = ChannelState::Failed;
        Err(err)
    }
}

/// Parse the `<length>,"<hex>"` body of a tagged response into raw bytes.
///
/// The length field before the comma is advisory and ignored; quotes around
/// the hex field are optional and anything after the closing quote is
/// dropped, matching the laxest firmwares observed.
fn parse_tagged_body(body: &str) -> Result<Bytes, AtError> {
    let (_, field) = body
        .split_once(',')
        .ok_or(AtError::MalformedResponse("tagged response missing comma"))?;
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.find('"').map_or(field, |end| &field[..end]);
    let decoded = hex::decode(field)?;
    Ok(Bytes::from(decoded))
}

impl<C: ByteChannel> CardTransport for AtTransport<C> {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        // The session owns the serial handle for its whole lifetime
        true
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.close_channel();
        self.drain_stale();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tagged_body_decodes_quoted_hex() {
        let bytes = parse_tagged_body("4,\"9000\"").unwrap();
        assert_eq!(bytes.as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn parse_tagged_body_accepts_leading_space() {
        // The CGLA tag keeps the space in the remainder
        let bytes = parse_tagged_body(" 12,\"00A4040000\"").unwrap();
        assert_eq!(bytes.as_ref(), &[0x00, 0xA4, 0x04, 0x00, 0x00]);
    }

    #[test]
    fn parse_tagged_body_accepts_unquoted_hex() {
        let bytes = parse_tagged_body("4,9000").unwrap();
        assert_eq!(bytes.as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn parse_tagged_body_ignores_trailing_garbage() {
        let bytes = parse_tagged_body("4,\"9000\",2").unwrap();
        assert_eq!(bytes.as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn parse_tagged_body_accepts_lowercase_hex() {
        let bytes = parse_tagged_body("6,\"6f2a90\"").unwrap();
        assert_eq!(bytes.as_ref(), &[0x6F, 0x2A, 0x90]);
    }

    #[test]
    fn parse_tagged_body_rejects_missing_comma() {
        assert!(matches!(
            parse_tagged_body("\"9000\""),
            Err(AtError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_tagged_body_rejects_odd_hex() {
        assert!(matches!(parse_tagged_body("3,\"900\""), Err(AtError::Hex(_))));
    }

    #[test]
    fn parse_tagged_body_rejects_non_hex() {
        assert!(matches!(
            parse_tagged_body("4,\"WXYZ\""),
            Err(AtError::Hex(_))
        ));
    }

    #[test]
    fn parse_tagged_body_allows_empty_payload() {
        let bytes = parse_tagged_body("0,\"\"").unwrap();
        assert!(bytes.is_empty());
    }
}

//! Response tokenization for the modem byte stream
//!
//! The modem answers with a CR/LF-delimited line stream, but serial reads
//! surface arbitrary fragments of it: a chunk may end mid-line and the next
//! read completes it, or one chunk may carry several lines at once.
//! [`LineScanner`] reassembles fragments into whole lines so classification
//! is independent of how the stream happened to be chunked; [`classify`]
//! maps each line onto the protocol outcomes the transport acts on.

/// Classification of one response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Terminal `OK` token
    Ok,
    /// Line contained `ERROR` (bare, or e.g. `+CME ERROR: 3`)
    Error,
    /// Line matched the expected tag; holds the remainder after the tag
    Data(String),
    /// Command echo or unsolicited noise to discard
    Noise,
}

/// Classify `line` against an optional expected tag prefix.
///
/// The order is significant: an `ERROR` substring wins over everything else
/// (so `+CME ERROR: 3` terminates a response even though it is not the bare
/// token), the exact `OK` token terminates successfully, and only then is
/// the tag tried. Anything else is noise.
pub(crate) fn classify(line: &str, expected: Option<&str>) -> Outcome {
    if line.contains("ERROR") {
        Outcome::Error
    } else if line == "OK" {
        Outcome::Ok
    } else if let Some(rest) = expected.and_then(|tag| line.strip_prefix(tag)) {
        Outcome::Data(rest.to_owned())
    } else {
        Outcome::Noise
    }
}

/// Reassembles CR/LF-delimited lines out of arbitrarily fragmented reads
///
/// Bytes accumulate until a delimiter arrives; a trailing fragment without
/// its delimiter is held back until the read that completes it. Empty
/// segments (the gap inside a `\r\n` pair) are skipped.
#[derive(Debug, Default)]
pub(crate) struct LineScanner {
    buf: Vec<u8>,
}

impl LineScanner {
    pub(crate) const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Discard everything buffered, a pending partial line included
    pub(crate) fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append a chunk as read from the device
    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, lossily decoded
    pub(crate) fn next_line(&mut self) -> Option<String> {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\r' || b == b'\n') {
            let segment: Vec<u8> = self.buf.drain(..=pos).collect();
            let segment = &segment[..pos];
            if segment.is_empty() {
                continue;
            }
            return Some(String::from_utf8_lossy(segment).into_owned());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scanner: &mut LineScanner) -> Vec<String> {
        std::iter::from_fn(|| scanner.next_line()).collect()
    }

    #[test]
    fn splits_lines_at_crlf() {
        let mut scanner = LineScanner::new();
        scanner.extend(b"+CSIM: 4,\"9000\"\r\nOK\r\n");
        assert_eq!(drain(&mut scanner), vec!["+CSIM: 4,\"9000\"", "OK"]);
    }

    #[test]
    fn bare_newline_also_delimits() {
        let mut scanner = LineScanner::new();
        scanner.extend(b"OK\n");
        assert_eq!(drain(&mut scanner), vec!["OK"]);
    }

    #[test]
    fn partial_line_is_held_until_completed() {
        let mut scanner = LineScanner::new();
        scanner.extend(b"+CSI");
        assert_eq!(scanner.next_line(), None);
        scanner.extend(b"M: 4,\"9000\"\r");
        assert_eq!(scanner.next_line().unwrap(), "+CSIM: 4,\"9000\"");
        assert_eq!(scanner.next_line(), None);
    }

    #[test]
    fn byte_at_a_time_matches_single_chunk() {
        let stream = b"AT+CSIM=10,\"0070000001\"\r\r\n+CSIM: 4,\"9000\"\r\nOK\r\n";

        let mut whole = LineScanner::new();
        whole.extend(stream);
        let expected = drain(&mut whole);

        let mut fragmented = LineScanner::new();
        let mut lines = Vec::new();
        for byte in stream {
            fragmented.extend(std::slice::from_ref(byte));
            lines.extend(drain(&mut fragmented));
        }

        assert_eq!(lines, expected);
        assert_eq!(
            lines
                .iter()
                .map(|line| classify(line, Some("+CSIM: ")))
                .collect::<Vec<_>>(),
            vec![
                Outcome::Noise,
                Outcome::Data("4,\"9000\"".to_owned()),
                Outcome::Ok
            ]
        );
    }

    #[test]
    fn clear_discards_pending_fragment() {
        let mut scanner = LineScanner::new();
        scanner.extend(b"+CSIM: 4,\"90");
        scanner.clear();
        scanner.extend(b"OK\r\n");
        assert_eq!(drain(&mut scanner), vec!["OK"]);
    }

    #[test]
    fn classify_terminal_tokens() {
        assert_eq!(classify("OK", None), Outcome::Ok);
        assert_eq!(classify("ERROR", None), Outcome::Error);
        assert_eq!(classify("+CME ERROR: 3", Some("+CSIM: ")), Outcome::Error);
        // Only the exact token terminates
        assert_eq!(classify("OKAY", None), Outcome::Noise);
    }

    #[test]
    fn classify_captures_tag_remainder() {
        assert_eq!(
            classify("+CSIM: 4,\"9000\"", Some("+CSIM: ")),
            Outcome::Data("4,\"9000\"".to_owned())
        );
        // The CGLA tag carries no trailing space; the remainder keeps it
        assert_eq!(
            classify("+CGLA: 4,\"9000\"", Some("+CGLA:")),
            Outcome::Data(" 4,\"9000\"".to_owned())
        );
        assert_eq!(classify("+CSIM: 4,\"9000\"", None), Outcome::Noise);
        assert_eq!(classify("+CPIN: READY", Some("+CSIM: ")), Outcome::Noise);
    }

    #[test]
    fn error_substring_beats_tag_match() {
        assert_eq!(
            classify("+CSIM ERROR: SIM busy", Some("+CSIM: ")),
            Outcome::Error
        );
    }
}

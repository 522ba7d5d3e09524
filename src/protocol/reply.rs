//! Module `reply`
//!
//! Parses server reply lines into [`Reply`] values and classifies reply codes
//! per the RFC 959 taxonomy. Multi-line replies (`123-...` through `123 ...`)
//! are accumulated into one logical reply before returning to the caller.

use std::fmt;
use std::io::{BufRead, Read};

use crate::error::{ConnectionError, FtpClientError, ProtocolError};

/// Reply class, determined by the first digit of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    PositivePreliminary,
    PositiveCompletion,
    PositiveIntermediate,
    TransientNegative,
    PermanentNegative,
}

impl ReplyClass {
    /// Classifies a reply code. Codes outside 100..=599 have no class.
    pub fn from_code(code: u16) -> Option<Self> {
        match code / 100 {
            1 => Some(ReplyClass::PositivePreliminary),
            2 => Some(ReplyClass::PositiveCompletion),
            3 => Some(ReplyClass::PositiveIntermediate),
            4 => Some(ReplyClass::TransientNegative),
            5 => Some(ReplyClass::PermanentNegative),
            _ => None,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ReplyClass::TransientNegative | ReplyClass::PermanentNegative
        )
    }
}

/// A complete server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    text: String,
    multiline: bool,
}

impl Reply {
    /// Builds a single-line reply. `code` must lie in 100..=599.
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            multiline: false,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Reply text without the code; multi-line text is joined with `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn class(&self) -> ReplyClass {
        // Construction through the codec guarantees a valid code.
        ReplyClass::from_code(self.code).unwrap_or(ReplyClass::PermanentNegative)
    }

    pub fn is_failure(&self) -> bool {
        self.class().is_failure()
    }

    pub fn is_completion(&self) -> bool {
        self.class() == ReplyClass::PositiveCompletion
    }

    /// Whether the code is one of `codes`.
    pub fn is_one_of(&self, codes: &[u16]) -> bool {
        codes.contains(&self.code)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

/// One parsed physical reply line.
#[derive(Debug, PartialEq, Eq)]
pub struct ReplyLine<'a> {
    pub code: u16,
    pub continues: bool,
    pub text: &'a str,
}

/// Parses a reply line (delimiter already stripped).
///
/// The first three bytes must be ASCII digits forming a code in 100..=599 and
/// the fourth must be a space (final line) or a hyphen (continuation).
pub fn parse_reply_line(line: &str) -> Result<ReplyLine<'_>, ProtocolError> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(ProtocolError::MalformedReply(line.to_string()));
    }

    let continues = match bytes[3] {
        b' ' => false,
        b'-' => true,
        _ => return Err(ProtocolError::MalformedReply(line.to_string())),
    };

    let code = bytes[..3]
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    if ReplyClass::from_code(code).is_none() {
        return Err(ProtocolError::MalformedReply(line.to_string()));
    }

    Ok(ReplyLine {
        code,
        continues,
        text: &line[4..],
    })
}

/// Longest reply or listing line accepted, delimiter included.
pub const MAX_LINE_LENGTH: usize = 8192;

/// Reads one CRLF (or bare LF) terminated line, without the delimiter.
///
/// A stream that ends before a full line arrives is a closed connection; a
/// line longer than [`MAX_LINE_LENGTH`] is a malformed reply.
pub(crate) fn read_line<R: BufRead>(reader: &mut R) -> Result<String, FtpClientError> {
    let mut buf = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', &mut buf)
        .map_err(ConnectionError::from)?;
    if buf.last() != Some(&b'\n') {
        if n >= MAX_LINE_LENGTH {
            let head = String::from_utf8_lossy(&buf[..64]);
            return Err(ProtocolError::MalformedReply(format!("{}...", head)).into());
        }
        return Err(ConnectionError::Closed.into());
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads one logical reply from `reader`, accumulating multi-line blocks.
///
/// Continuation lines may carry the `123-` prefix or arbitrary text; the block
/// ends at the first line starting with the opening code and a space.
pub fn read_reply<R: BufRead>(reader: &mut R, max_lines: usize) -> Result<Reply, FtpClientError> {
    let first = read_line(reader)?;
    let head = parse_reply_line(&first)?;
    if !head.continues {
        return Ok(Reply::new(head.code, head.text));
    }

    let code = head.code;
    let terminator = format!("{} ", code);
    let continuation = format!("{}-", code);
    let mut lines = vec![head.text.to_string()];

    loop {
        if lines.len() >= max_lines {
            return Err(ProtocolError::TooManyLines {
                code,
                limit: max_lines,
            }
            .into());
        }

        let line = read_line(reader)?;
        if let Some(rest) = line.strip_prefix(&terminator) {
            lines.push(rest.to_string());
            break;
        }
        match line.strip_prefix(&continuation) {
            Some(rest) => lines.push(rest.to_string()),
            None => lines.push(line),
        }
    }

    Ok(Reply {
        code,
        text: lines.join("\n"),
        multiline: true,
    })
}

//! HTTP response decoder
//!
//! Runs a [`LineDecoder`] over the bytes read from the connection and classifies every
//! line through an explicit state machine:
//!
//! ```text
//! AwaitingStatusLine -> InHeaders -> InBody -> Done
//! ```
//!
//! - the status line must be `HTTP/1.1` or `HTTP/1.0`, a three digit status code and an
//!   optional reason phrase
//! - a blank line ends the headers; with a positive `content-length` the decoder is told
//!   to deliver the whole body as the next line
//! - a `transfer-encoding` other than `identity` aborts decoding
//! - without a `content-length` (or with `0`) the body runs until end of stream
//!
//! [`Decoder::decode`] returns the [`Response`] as soon as the declared body length has
//! been read, [`Decoder::decode_eof`] flushes the rest once the peer has closed.

use bytes::BytesMut;
use http::{StatusCode, Version};
use tokio_util::codec::Decoder;
use tracing::{debug, error, trace, warn};

use crate::codec::LineDecoder;
use crate::ensure;
use crate::protocol::{FieldMap, Line, ParseError, Response, ResponseHeaders};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingStatusLine,
    InHeaders,
    InBody,
    Done,
}

#[derive(Debug)]
struct StatusLine {
    version: Version,
    status: StatusCode,
    reason_phrase: String,
}

#[derive(Debug)]
pub struct ResponseDecoder {
    state: State,
    line_decoder: LineDecoder,
    status_line: Option<StatusLine>,
    fields: FieldMap,
    content_length: Option<u64>,
    body: BytesMut,
    bytes_read: u64,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns true once the header section is over and the declared body length, if
    /// any, has been read.
    ///
    /// Without a positive content length the response only completes at end of stream.
    pub fn is_complete(&self) -> bool {
        match self.state {
            State::Done => true,
            State::InBody => self.declared_length().is_some_and(|length| self.bytes_read >= length),
            State::AwaitingStatusLine | State::InHeaders => false,
        }
    }

    fn declared_length(&self) -> Option<u64> {
        self.content_length.filter(|length| *length > 0)
    }

    /// Applies one decoded line to the state machine.
    fn on_line(&mut self, line: Line) -> Result<(), ParseError> {
        match self.state {
            State::AwaitingStatusLine => {
                let status_line = parse_status_line(line.text()?)?;
                debug!(status = status_line.status.as_u16(), reason = %status_line.reason_phrase, "decoded status line");
                self.status_line = Some(status_line);
                self.state = State::InHeaders;
            }

            State::InHeaders if line.is_blank() => {
                if let Some(length) = self.declared_length() {
                    let length = usize::try_from(length)
                        .map_err(|_e| ParseError::invalid_content_length(format!("value {length} is too large")))?;
                    self.line_decoder.expect_bytes(length);
                }
                trace!(content_length = ?self.content_length, "end of header section");
                self.state = State::InBody;
            }

            State::InHeaders => self.on_header(line.text()?)?,

            State::InBody => {
                let line_size = line.len();
                let keep = match self.declared_length() {
                    Some(length) => {
                        let remaining = usize::try_from(length.saturating_sub(self.bytes_read)).unwrap_or(usize::MAX);
                        remaining.min(line_size)
                    }
                    None => line_size,
                };

                if keep < line_size {
                    warn!(discarded = line_size - keep, "discard bytes beyond content-length");
                }
                self.body.extend_from_slice(&line.as_bytes()[..keep]);
                self.bytes_read += line_size as u64;
            }

            State::Done => {
                warn!(line_size = line.len(), "discard line received after response was complete");
            }
        }

        Ok(())
    }

    fn on_header(&mut self, text: &str) -> Result<(), ParseError> {
        let Some((name, value)) = text.split_once(':') else {
            return Err(ParseError::invalid_header(format!("missing colon in {:?}", text.trim_end())));
        };

        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        ensure!(!name.is_empty(), ParseError::invalid_header(format!("empty name in {:?}", text.trim_end())));
        trace!(name = %name, value = %value, "decoded header");

        match name.as_str() {
            "transfer-encoding" if !value.eq_ignore_ascii_case("identity") => {
                error!(transfer_encoding = %value, "unsupported transfer-encoding");
                return Err(ParseError::unsupported_transfer_encoding(value));
            }

            "content-length" => {
                let length = value
                    .parse::<u64>()
                    .map_err(|_e| ParseError::invalid_content_length(format!("value {value} is not u64")))?;
                if let Some(previous) = self.content_length {
                    ensure!(
                        previous == length,
                        ParseError::invalid_content_length(format!("conflicting values {previous} and {length}"))
                    );
                }
                self.content_length = Some(length);
            }

            _ => {}
        }

        self.fields.append(&name, value);
        Ok(())
    }

    fn build_response(&mut self, src: &mut BytesMut) -> Result<Response, ParseError> {
        let StatusLine { version, status, reason_phrase } =
            self.status_line.take().ok_or(ParseError::incomplete("status line"))?;

        if !src.is_empty() {
            warn!(discarded = src.len(), "discard bytes received after response body");
            src.clear();
        }

        let body = String::from_utf8(self.body.split().to_vec()).map_err(|e| ParseError::from(e.utf8_error()))?;
        let headers = ResponseHeaders::from_fields(std::mem::take(&mut self.fields));
        self.state = State::Done;

        debug!(status = status.as_u16(), body_size = body.len(), "decoded response");
        Ok(Response::new(version, status, reason_phrase, headers, body))
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self {
            state: State::AwaitingStatusLine,
            line_decoder: LineDecoder::new(),
            status_line: None,
            fields: FieldMap::new(),
            content_length: None,
            body: BytesMut::new(),
            bytes_read: 0,
        }
    }
}

impl Decoder for ResponseDecoder {
    type Item = Response;
    type Error = ParseError;

    /// Feeds every complete line in `src` through the state machine.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(response))` once the declared body has been read
    /// - `Ok(None)` when more data is needed, or the response was already returned
    /// - `Err(ParseError)` on a protocol violation
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.state == State::Done {
            return Ok(None);
        }

        while !self.is_complete() {
            match self.line_decoder.decode(src)? {
                Some(line) => self.on_line(line)?,
                None => return Ok(None),
            }
        }

        self.build_response(src).map(Some)
    }

    /// Finishes decoding after the peer closed the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::IncompleteResponse`] if the stream ended before the status
    /// line or before the end of the header section.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.state == State::Done {
            return Ok(None);
        }

        while !self.is_complete() {
            match self.line_decoder.decode_eof(src)? {
                Some(line) => self.on_line(line)?,
                None => break,
            }
        }

        match self.state {
            State::AwaitingStatusLine => Err(ParseError::incomplete("status line")),
            State::InHeaders => Err(ParseError::incomplete("header section")),
            State::InBody => {
                if let Some(length) = self.declared_length().filter(|length| self.bytes_read < *length) {
                    warn!(content_length = length, bytes_read = self.bytes_read, "connection closed before full body was read");
                }
                self.build_response(src).map(Some)
            }
            State::Done => Ok(None),
        }
    }
}

/// Parses `HTTP/1.x SP 3DIGIT [SP reason-phrase]`.
fn parse_status_line(text: &str) -> Result<StatusLine, ParseError> {
    let line = text.trim_end_matches(['\r', '\n']);

    let (version, rest) = if let Some(rest) = line.strip_prefix("HTTP/1.1") {
        (Version::HTTP_11, rest)
    } else if let Some(rest) = line.strip_prefix("HTTP/1.0") {
        (Version::HTTP_10, rest)
    } else {
        error!(line = %line, "unsupported status line");
        return Err(ParseError::invalid_status_line(line));
    };

    let rest = rest.strip_prefix(' ').ok_or_else(|| ParseError::invalid_status_line(line))?;
    let (code, reason_phrase) = rest.split_once(' ').unwrap_or((rest, ""));

    ensure!(code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()), ParseError::invalid_status_line(line));
    let status = StatusCode::from_bytes(code.as_bytes()).map_err(|_e| ParseError::invalid_status_line(line))?;

    Ok(StatusLine { version, status, reason_phrase: reason_phrase.to_string() })
}

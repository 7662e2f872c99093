//! Incremental splitter turning a byte stream into [`Line`]s.
//!
//! The decoder knows nothing about HTTP. It works in one of two modes:
//!
//! - line mode (the default): a line ends right after the first `\n`
//! - fixed-length mode, entered through [`LineDecoder::expect_bytes`]: the next line is
//!   exactly that many bytes, after which the decoder falls back to line mode
//!
//! Bytes are buffered by the caller in a [`BytesMut`], so data split across reads is
//! kept until enough has arrived. Each call to [`Decoder::decode`] yields at most one
//! line, which lets the caller switch modes between two lines.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{Line, ParseError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDecoder {
    /// Bytes wanted for the next line, `None` in line mode
    expected: Option<usize>,
    /// Prefix of the buffer already known to hold no `\n`
    scanned: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next line exactly `count` bytes long.
    ///
    /// A count of zero leaves the decoder in line mode.
    pub fn expect_bytes(&mut self, count: usize) {
        if count > 0 {
            self.expected = Some(count);
        }
    }

    pub fn expected_bytes(&self) -> Option<usize> {
        self.expected
    }

    fn split(&mut self, src: &mut BytesMut, at: usize) -> Line {
        self.expected = None;
        self.scanned = 0;
        Line::new(src.split_to(at).freeze())
    }
}

impl Decoder for LineDecoder {
    type Item = Line;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let split_at = match self.expected {
            Some(count) => (src.len() >= count).then_some(count),
            None => {
                let start = self.scanned.min(src.len());
                let found = src[start..].iter().position(|b| *b == b'\n');
                match found {
                    Some(index) => Some(start + index + 1),
                    None => {
                        self.scanned = src.len();
                        None
                    }
                }
            }
        };

        let Some(at) = split_at else {
            return Ok(None);
        };

        let line = self.split(src, at);
        trace!(line_size = line.len(), "decoded line");
        Ok(Some(line))
    }

    /// Flushes whatever is left once the stream has ended.
    ///
    /// Complete lines are still returned one at a time; the final unterminated or short
    /// remainder comes out as one last line.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let at = src.len();
        let line = self.split(src, at);
        trace!(line_size = line.len(), "flushed trailing bytes");
        Ok(Some(line))
    }
}

use bytes::Bytes;

use crate::protocol::ParseError;

/// A unit produced by the [`LineDecoder`](crate::codec::LineDecoder).
///
/// Either a line-feed terminated line (terminator included), or a block of exactly
/// the number of bytes the decoder was told to expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Bytes,
}

impl Line {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Raw length in bytes, terminator included.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns true if the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.bytes.iter().all(u8::is_ascii_whitespace)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Decodes the line as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidUtf8`] if the bytes are not valid UTF-8.
    pub fn text(&self) -> Result<&str, ParseError> {
        Ok(std::str::from_utf8(&self.bytes)?)
    }
}

impl From<&'static [u8]> for Line {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(bytes))
    }
}

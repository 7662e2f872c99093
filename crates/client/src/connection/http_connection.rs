use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, error, trace};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::connection::Connection;
use crate::protocol::{HttpError, ParseError, RequestHead, Response, SendError};

/// Initial capacity of the buffer the request is serialized into
const INIT_WRITE_BUFFER_SIZE: usize = 4 * 1024;

/// One request/response exchange on an exclusively owned connection.
#[derive(Debug)]
pub struct HttpConnection<C> {
    connection: C,
    read_buffer_size: usize,
}

impl<C: Connection> HttpConnection<C> {
    /// `read_buffer_size` is the most bytes asked of the connection per read.
    pub fn new(connection: C, read_buffer_size: usize) -> Self {
        Self { connection, read_buffer_size: read_buffer_size.max(1) }
    }

    /// Writes the request and blocks until the response is read or the peer closes.
    ///
    /// The underlying connection is closed before this returns, on success and on
    /// every error.
    pub fn round_trip(self, head: &RequestHead, body: &[u8]) -> Result<Response, HttpError> {
        let mut connection = CloseGuard(self.connection);

        let mut write_buf = BytesMut::with_capacity(INIT_WRITE_BUFFER_SIZE);
        RequestEncoder.encode((head, body), &mut write_buf)?;
        connection.0.write_all(&write_buf).map_err(SendError::io)?;
        debug!(request_size = write_buf.len(), "request sent");

        let response = read_response(&mut connection.0, self.read_buffer_size).inspect_err(|e| {
            error!(cause = %e, "can't read response");
        })?;
        Ok(response)
    }
}

fn read_response<C: Connection>(connection: &mut C, read_buffer_size: usize) -> Result<Response, ParseError> {
    let mut decoder = ResponseDecoder::new();
    let mut read_buf = BytesMut::with_capacity(read_buffer_size);
    let mut chunk = vec![0u8; read_buffer_size];

    loop {
        if let Some(response) = decoder.decode(&mut read_buf)? {
            return Ok(response);
        }

        let size = match connection.read(&mut chunk) {
            Ok(size) => size,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParseError::io(e)),
        };

        if size == 0 {
            trace!(buffered = read_buf.len(), "end of stream");
            return decoder.decode_eof(&mut read_buf)?.ok_or(ParseError::incomplete("response"));
        }

        trace!(read_size = size, "read from connection");
        read_buf.extend_from_slice(&chunk[..size]);
    }
}

/// Closes the wrapped connection when dropped.
#[derive(Debug)]
struct CloseGuard<C: Connection>(C);

impl<C: Connection> Drop for CloseGuard<C> {
    fn drop(&mut self) {
        self.0.close();
        trace!("connection closed");
    }
}

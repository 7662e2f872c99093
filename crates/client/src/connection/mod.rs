//! Transport capability and the request/response round trip
//!
//! The client never touches sockets directly. It goes through two small traits:
//!
//! - [`Connect`]: opens a [`Connection`] to `host:port`
//! - [`Connection`]: blocking `write_all`, `read` and `close`
//!
//! [`TcpConnector`] implements them over [`std::net::TcpStream`]. Any other transport,
//! for example one that puts a timeout on every read, can be plugged into the
//! [`Client`](crate::Client) through its builder.
//!
//! [`HttpConnection`] drives one round trip on a connection: it encodes and writes the
//! request, then reads until the [`ResponseDecoder`](crate::codec::ResponseDecoder) has
//! a complete response. The connection is closed on every exit path.

use std::fmt::Debug;
use std::io;

mod http_connection;
mod tcp;

pub use http_connection::HttpConnection;
pub use tcp::{TcpConnection, TcpConnector};

/// A blocking byte stream to a single peer.
pub trait Connection: Debug {
    /// Writes all of `buf` and flushes it.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Reads at most `buf.len()` bytes, blocking until at least one is available.
    ///
    /// Returns `Ok(0)` at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Closes the connection. Calling it more than once has no further effect.
    fn close(&mut self);
}

/// Opens connections.
pub trait Connect {
    type Connection: Connection;

    fn connect(&self, host: &str, port: u16) -> io::Result<Self::Connection>;
}

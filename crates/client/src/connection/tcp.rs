use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::{debug, trace};

use super::{Connect, Connection};

/// Opens plain TCP connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connect for TcpConnector {
    type Connection = TcpConnection;

    fn connect(&self, host: &str, port: u16) -> io::Result<Self::Connection> {
        let stream = TcpStream::connect((host, port))?;
        // requests go out in a single write, don't hold them back
        stream.set_nodelay(true)?;
        debug!(host, port, "connected");
        Ok(TcpConnection { stream: Some(stream) })
    }
}

#[derive(Debug)]
pub struct TcpConnection {
    stream: Option<TcpStream>,
}

impl TcpConnection {
    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(|| io::Error::from(ErrorKind::NotConnected))
    }
}

impl From<TcpStream> for TcpConnection {
    fn from(stream: TcpStream) -> Self {
        Self { stream: Some(stream) }
    }
}

impl Connection for TcpConnection {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let stream = self.stream()?;
        stream.write_all(buf)?;
        stream.flush()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream()?.read(buf)
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // the peer may already be gone, nothing left to do about it
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                trace!(cause = %e, "shutdown failed");
            }
        }
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        self.close();
    }
}

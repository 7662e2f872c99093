//! Serializes an outgoing request into raw bytes
//!
//! The output is the request line, one `name: value` line per header value in
//! [`HeaderStore::for_each`](crate::protocol::HeaderStore::for_each) order, an empty
//! line, and the body for methods that carry one.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::protocol::{RequestHead, SendError};

/// Initial buffer size reserved for the request line and headers
const INIT_HEADER_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestEncoder;

impl<'a> Encoder<(&'a RequestHead, &'a [u8])> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (&'a RequestHead, &'a [u8]), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, body) = item;
        let target = head.target()?;

        dst.reserve(INIT_HEADER_SIZE + body.len());

        dst.put_slice(head.method().as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(target.as_bytes());
        dst.put_slice(b" HTTP/1.1\r\n");

        head.headers().for_each(|name, values| {
            for value in values {
                dst.put_slice(name.as_bytes());
                dst.put_slice(b": ");
                dst.put_slice(value.as_bytes());
                dst.put_slice(b"\r\n");
            }
        });
        dst.put_slice(b"\r\n");

        if head.method().has_body() {
            dst.put_slice(body);
        }

        trace!(size = dst.len(), "encoded request");
        Ok(())
    }
}

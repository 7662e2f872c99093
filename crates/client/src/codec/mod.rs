//! HTTP codec module for encoding requests and decoding responses
//!
//! All codecs implement the [`tokio_util::codec`] traits over a [`bytes::BytesMut`]
//! buffer, so they work on whatever bytes have arrived so far and keep their own
//! progress between calls.
//!
//! - [`LineDecoder`]: splits a byte stream into lines, or into fixed-size blocks once
//!   told how many bytes to expect
//! - [`ResponseDecoder`]: state machine turning lines into a [`Response`](crate::protocol::Response)
//! - [`RequestEncoder`]: serializes a [`RequestHead`](crate::protocol::RequestHead) and its body
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_http_client::codec::ResponseDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
//!
//! let response = decoder.decode(&mut buf).unwrap().unwrap();
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.body(), "hi");
//! ```

mod line_decoder;
mod request_encoder;
mod response_decoder;

pub use line_decoder::LineDecoder;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;

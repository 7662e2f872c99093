//! A blocking micro HTTP/1.1 client
//!
//! This crate sends one request per connection and reads the whole response before
//! handing it back. It focuses on a small, predictable API: every request opens its own
//! connection, asks the server to close it, and reads the body as delimited by
//! `Content-Length` or by the end of the stream.
//!
//! # Features
//!
//! - GET, POST, PUT and DELETE requests
//! - Query parameters appended to the ones already in the URI
//! - Request header collection with computed pseudo-headers (`host`, `content-length`, ...)
//! - Immutable response headers with typed accessors for dates, content type and length
//! - Pluggable transport through the [`connection::Connect`] trait
//! - Incremental response decoding on top of [`tokio_util::codec`]
//!
//! # Example
//!
//! ```no_run
//! use micro_http_client::protocol::HttpError;
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! fn main() -> Result<(), HttpError> {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let mut request = micro_http_client::post("http://127.0.0.1:8080/echo")?;
//!     request.query("lang", "en");
//!     request.headers_mut().set("x-request-id", "42")?;
//!     request.write("hello")?;
//!
//!     let response = request.close()?;
//!     info!(status = response.status_code(), body = response.body(), "received response");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Client`]: configuration and the request entry points
//! - [`connection`]: transport traits, the TCP transport and the round trip driver
//! - [`protocol`]: requests, responses, headers and error types
//! - [`codec`]: the line decoder, response decoder and request encoder
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no TLS (`https` URIs are rejected)
//! - No chunked transfer encoding and no content encodings
//! - No keep-alive, redirects, cookies or proxies
//! - Bodies are decoded as UTF-8 text

mod client;
pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

pub use client::{delete, get, post, put, Client, ClientBuilder, DEFAULT_READ_BUFFER_SIZE};

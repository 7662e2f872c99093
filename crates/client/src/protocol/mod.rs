//! Core HTTP protocol types of the client.
//!
//! # Architecture
//!
//! - **Messages** (`message`): [`Line`], the unit produced by the line decoder
//! - **Requests** (`request`): [`RequestHead`] and the connection-owning [`Request`]
//! - **Responses** (`response`): the fully read, immutable [`Response`]
//! - **Headers** ([`header`]): [`HeaderStore`] with its request and response policies
//! - **Errors** (`error`): [`HttpError`] wrapping [`RequestError`], [`HeaderError`],
//!   [`SendError`] and [`ParseError`]
//!
//! These types are usually reached through [`Client`](crate::Client) rather than built
//! directly.

mod message;
pub use message::Line;

mod method;
pub use method::Method;

mod request;
pub use request::Request;
pub use request::RequestHead;
pub use request::HTTP_PORT;

mod response;
pub use response::Response;

mod error;
pub use error::HeaderError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::RequestError;
pub use error::SendError;

pub mod header;
pub use header::{
    Access, FieldMap, HeaderPolicy, HeaderStore, PseudoHeader, RequestHeaders, RequestPolicy, ResponseHeaders,
    ResponsePolicy,
};

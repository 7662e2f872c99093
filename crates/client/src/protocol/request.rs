//! Outgoing request types.
//!
//! [`RequestHead`] holds everything that goes before the body: method, target URI,
//! query parameters and the mutable [`RequestHeaders`]. [`Request`] adds the body and
//! the connection the request is sent on.

use std::fmt::Display;

use bytes::BytesMut;
use http::Uri;
use tracing::debug;

use crate::connection::{Connection, HttpConnection};
use crate::ensure;
use crate::protocol::{
    FieldMap, HeaderStore, HttpError, Method, RequestError, RequestHeaders, RequestPolicy, Response, SendError,
};

/// Port used when the URI doesn't name one.
pub const HTTP_PORT: u16 = 80;

#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    uri: Uri,
    host: String,
    port: u16,
    query: Vec<(String, String)>,
    headers: RequestHeaders,
}

impl RequestHead {
    /// Validates `uri` and prepares the head of a `method` request to it.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::UnsupportedScheme`] for anything but `http`, and
    /// [`SendError::InvalidUri`] when the URI has no host or a malformed query.
    pub fn new(method: Method, uri: Uri) -> Result<Self, SendError> {
        if let Some(scheme) = uri.scheme_str() {
            ensure!(scheme.eq_ignore_ascii_case("http"), SendError::unsupported_scheme(scheme));
        }

        let host = uri.host().filter(|host| !host.is_empty()).ok_or_else(|| SendError::invalid_uri(format!("{uri} has no host")))?;
        let host_header = match uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let query = match uri.query() {
            Some(query) => serde_urlencoded::from_str::<Vec<(String, String)>>(query)
                .map_err(|e| SendError::invalid_uri(format!("invalid query {query:?}: {e}")))?,
            None => Vec::new(),
        };

        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
        let port = uri.port_u16().unwrap_or(HTTP_PORT);
        let headers = HeaderStore::from_parts(FieldMap::new(), RequestPolicy::new(host_header, method.has_body()));

        Ok(Self { method, uri, host, port, query, headers })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Host to connect to, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut RequestHeaders {
        &mut self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn add_query<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.query.push((key.into(), value.into()));
    }

    /// The request-target written on the request line: the path, followed by the
    /// percent-encoded query parameters if there are any.
    pub fn target(&self) -> Result<String, SendError> {
        let path = match self.uri.path() {
            "" => "/",
            path => path,
        };

        if self.query.is_empty() {
            return Ok(path.to_string());
        }

        let query = serde_urlencoded::to_string(&self.query).map_err(|e| SendError::invalid_uri(e.to_string()))?;
        Ok(format!("{path}?{query}"))
    }
}

/// A request being built on its own connection.
///
/// The connection is opened when the request is created and used for exactly one
/// round trip by [`close`](Request::close), which consumes the request.
#[derive(Debug)]
pub struct Request<C> {
    head: RequestHead,
    body: BytesMut,
    connection: HttpConnection<C>,
}

impl<C: Connection> Request<C> {
    pub(crate) fn new(head: RequestHead, connection: HttpConnection<C>) -> Self {
        Self { head, body: BytesMut::new(), connection }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn method(&self) -> Method {
        self.head.method()
    }

    pub fn uri(&self) -> &Uri {
        self.head.uri()
    }

    pub fn headers(&self) -> &RequestHeaders {
        self.head.headers()
    }

    pub fn headers_mut(&mut self) -> &mut RequestHeaders {
        self.head.headers_mut()
    }

    /// Appends a query parameter to the ones already in the URI.
    pub fn query<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.head.add_query(key, value);
        self
    }

    /// Appends the text representation of `content` to the body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::BodyNotAllowed`] for GET and DELETE requests; nothing is
    /// written in that case.
    pub fn write<T: Display>(&mut self, content: T) -> Result<(), RequestError> {
        self.write_bytes(content.to_string().as_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), RequestError> {
        let method = self.head.method();
        ensure!(method.has_body(), RequestError::BodyNotAllowed { method: method.as_str() });

        self.body.extend_from_slice(bytes);
        let length = self.body.len() as u64;
        self.head.headers_mut().policy_mut().set_content_length(length);
        Ok(())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Sends the request and blocks until the whole response has been read.
    ///
    /// The connection is closed when this returns, whether it succeeded or not.
    pub fn close(self) -> Result<Response, HttpError> {
        let Self { head, body, connection } = self;
        debug!(method = %head.method(), uri = %head.uri(), body_size = body.len(), "sending request");
        connection.round_trip(&head, &body)
    }
}

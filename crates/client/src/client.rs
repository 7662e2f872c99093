use std::fmt::Display;

use http::Uri;
use tracing::debug;

use crate::connection::{Connect, HttpConnection, TcpConnection, TcpConnector};
use crate::protocol::{HttpError, Method, Request, RequestHead, SendError};

/// Default number of bytes requested from the connection per read
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct ClientBuilder<K> {
    connector: K,
    read_buffer_size: usize,
}

impl ClientBuilder<TcpConnector> {
    fn new() -> Self {
        Self { connector: TcpConnector, read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }
}

impl<K: Connect> ClientBuilder<K> {
    /// Replaces the transport used to open connections.
    pub fn connector<T: Connect>(self, connector: T) -> ClientBuilder<T> {
        ClientBuilder { connector, read_buffer_size: self.read_buffer_size }
    }

    /// Sets how many bytes at most are asked of the connection per read, clamped to at least one.
    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size.max(1);
        self
    }

    pub fn build(self) -> Client<K> {
        Client { connector: self.connector, read_buffer_size: self.read_buffer_size }
    }
}

/// Opens one connection per request.
///
/// ```no_run
/// use micro_http_client::Client;
///
/// let client = Client::new();
/// let mut request = client.post("http://localhost:8080/echo")?;
/// request.write("hello")?;
/// let response = request.close()?;
/// println!("{} {}", response.status_code(), response.body());
/// # Ok::<(), micro_http_client::protocol::HttpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client<K = TcpConnector> {
    connector: K,
    read_buffer_size: usize,
}

impl Client {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder<TcpConnector> {
        ClientBuilder::new()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Connect> Client<K> {
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Validates `uri`, connects to its host and returns the request, ready to be
    /// given headers and a body.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidUri`] or [`SendError::UnsupportedScheme`] for URIs
    /// that can't be requested, and [`SendError::Connect`] when no connection could be
    /// opened.
    pub fn request<U>(&self, method: Method, uri: U) -> Result<Request<K::Connection>, HttpError>
    where
        U: TryInto<Uri>,
        U::Error: Display,
    {
        let uri = uri.try_into().map_err(SendError::invalid_uri)?;
        let head = RequestHead::new(method, uri)?;

        let connection = self
            .connector
            .connect(head.host(), head.port())
            .map_err(|e| SendError::connect(head.host(), head.port(), e))?;
        debug!(%method, host = head.host(), port = head.port(), "opened connection");

        Ok(Request::new(head, HttpConnection::new(connection, self.read_buffer_size)))
    }

    pub fn get<U>(&self, uri: U) -> Result<Request<K::Connection>, HttpError>
    where
        U: TryInto<Uri>,
        U::Error: Display,
    {
        self.request(Method::Get, uri)
    }

    pub fn post<U>(&self, uri: U) -> Result<Request<K::Connection>, HttpError>
    where
        U: TryInto<Uri>,
        U::Error: Display,
    {
        self.request(Method::Post, uri)
    }

    pub fn put<U>(&self, uri: U) -> Result<Request<K::Connection>, HttpError>
    where
        U: TryInto<Uri>,
        U::Error: Display,
    {
        self.request(Method::Put, uri)
    }

    pub fn delete<U>(&self, uri: U) -> Result<Request<K::Connection>, HttpError>
    where
        U: TryInto<Uri>,
        U::Error: Display,
    {
        self.request(Method::Delete, uri)
    }
}

/// Starts a GET request over TCP with the default settings.
pub fn get<U>(uri: U) -> Result<Request<TcpConnection>, HttpError>
where
    U: TryInto<Uri>,
    U::Error: Display,
{
    Client::new().get(uri)
}

/// Starts a POST request over TCP with the default settings.
pub fn post<U>(uri: U) -> Result<Request<TcpConnection>, HttpError>
where
    U: TryInto<Uri>,
    U::Error: Display,
{
    Client::new().post(uri)
}

/// Starts a PUT request over TCP with the default settings.
pub fn put<U>(uri: U) -> Result<Request<TcpConnection>, HttpError>
where
    U: TryInto<Uri>,
    U::Error: Display,
{
    Client::new().put(uri)
}

/// Starts a DELETE request over TCP with the default settings.
pub fn delete<U>(uri: U) -> Result<Request<TcpConnection>, HttpError>
where
    U: TryInto<Uri>,
    U::Error: Display,
{
    Client::new().delete(uri)
}

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: RequestError,
    },

    #[error("header error: {source}")]
    HeaderError {
        #[from]
        source: HeaderError,
    },

    #[error("send error: {source}")]
    SendError {
        #[from]
        source: SendError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ParseError,
    },
}

/// Errors raised while decoding a response from the wire.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid status line: {line:?}")]
    InvalidStatusLine { line: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("unsupported transfer-encoding: {value}")]
    UnsupportedTransferEncoding { value: String },

    #[error("line is not valid utf-8: {source}")]
    InvalidUtf8 {
        #[from]
        source: std::str::Utf8Error,
    },

    #[error("connection closed before {stage} was complete")]
    IncompleteResponse { stage: &'static str },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_status_line<S: ToString>(line: S) -> Self {
        Self::InvalidStatusLine { line: line.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn unsupported_transfer_encoding<S: ToString>(value: S) -> Self {
        Self::UnsupportedTransferEncoding { value: value.to_string() }
    }

    pub fn incomplete(stage: &'static str) -> Self {
        Self::IncompleteResponse { stage }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while preparing or transmitting a request.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid uri: {reason}")]
    InvalidUri { reason: String },

    #[error("unsupported scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("can't connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_uri<S: ToString>(str: S) -> Self {
        Self::InvalidUri { reason: str.to_string() }
    }

    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }

    pub fn connect<S: ToString>(host: S, port: u16, source: io::Error) -> Self {
        Self::Connect { host: host.to_string(), port, source }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised by header accessors and mutators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header `{name}` is read only")]
    ReadOnly { name: String },

    #[error("header `{name}` is not supported")]
    Unsupported { name: String },

    #[error("headers are immutable, can't modify `{name}`")]
    Immutable { name: String },

    #[error("header `{name}` has {count} values, expect a single one")]
    Ambiguous { name: String, count: usize },

    #[error("invalid header name: {name:?}")]
    InvalidName { name: String },

    #[error("invalid value for header `{name}`: {value:?}")]
    InvalidValue { name: String, value: String },
}

impl HeaderError {
    pub fn read_only<S: ToString>(name: S) -> Self {
        Self::ReadOnly { name: name.to_string() }
    }

    pub fn unsupported<S: ToString>(name: S) -> Self {
        Self::Unsupported { name: name.to_string() }
    }

    pub fn immutable<S: ToString>(name: S) -> Self {
        Self::Immutable { name: name.to_string() }
    }

    pub fn ambiguous<S: ToString>(name: S, count: usize) -> Self {
        Self::Ambiguous { name: name.to_string(), count }
    }

    /// Returns true for the errors that reject a mutation outright, as opposed to invalid input.
    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self, Self::ReadOnly { .. } | Self::Unsupported { .. } | Self::Immutable { .. })
    }
}

/// Errors raised by request operations that are invalid for the request's method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{method} request can't have a body")]
    BodyNotAllowed { method: &'static str },
}

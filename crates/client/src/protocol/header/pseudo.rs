//! Header names whose values are computed instead of stored.
//!
//! Every pseudo-header is described by a single table entry. A header store looks a
//! name up here first and, on a hit, asks its policy how the header behaves instead
//! of touching the free-form fields.

/// A header with derived, fixed or unsupported semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoHeader {
    AcceptCharset,
    AcceptEncoding,
    Connection,
    ContentLength,
    ContentType,
    Host,
    Date,
    Expires,
    IfModifiedSince,
    TransferEncoding,
    /// The persistent-connection flag, addressed by the `keep-alive` header name.
    KeepAlive,
}

impl PseudoHeader {
    /// All pseudo-headers, in the order they are visited and serialized.
    pub const ALL: [PseudoHeader; 11] = [
        PseudoHeader::AcceptCharset,
        PseudoHeader::AcceptEncoding,
        PseudoHeader::Connection,
        PseudoHeader::ContentLength,
        PseudoHeader::ContentType,
        PseudoHeader::Host,
        PseudoHeader::Date,
        PseudoHeader::Expires,
        PseudoHeader::IfModifiedSince,
        PseudoHeader::TransferEncoding,
        PseudoHeader::KeepAlive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoHeader::AcceptCharset => "accept-charset",
            PseudoHeader::AcceptEncoding => "accept-encoding",
            PseudoHeader::Connection => "connection",
            PseudoHeader::ContentLength => "content-length",
            PseudoHeader::ContentType => "content-type",
            PseudoHeader::Host => "host",
            PseudoHeader::Date => "date",
            PseudoHeader::Expires => "expires",
            PseudoHeader::IfModifiedSince => "if-modified-since",
            PseudoHeader::TransferEncoding => "transfer-encoding",
            PseudoHeader::KeepAlive => "keep-alive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|header| header.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// How a header store treats mutations of a pseudo-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Always reads as the given constant, can't be changed.
    Fixed(&'static str),
    /// Computed from other state, can't be changed.
    Derived,
    /// Stored by the policy and freely changeable.
    Settable,
    /// Reads as absent, can't be changed.
    Unsupported,
}

//! The two behaviors a [`HeaderStore`](super::HeaderStore) can be parameterized with.
//!
//! - [`RequestPolicy`]: mutable, pseudo-headers derived from the request being built
//! - [`ResponsePolicy`]: immutable, pseudo-headers parsed out of the received fields

use std::fmt::Debug;

use super::{Access, FieldMap, PseudoHeader};

/// Capability set of a header store.
pub trait HeaderPolicy: Debug {
    /// Whether any mutator may succeed on a store with this policy.
    const MUTABLE: bool;

    /// Mutation rule for a pseudo-header.
    fn access(header: PseudoHeader) -> Access;

    /// Current value of a pseudo-header that is not [`Access::Fixed`], `None` when absent.
    fn value(&self, header: PseudoHeader, fields: &FieldMap) -> Option<String>;

    /// Every value of a pseudo-header that is not [`Access::Fixed`], `None` when absent.
    fn values(&self, header: PseudoHeader, fields: &FieldMap) -> Option<Vec<String>> {
        self.value(header, fields).map(|value| vec![value])
    }

    /// Stores the value of a [`Access::Settable`] pseudo-header, `None` clears it.
    fn store(&mut self, header: PseudoHeader, value: Option<String>);
}

/// Pseudo-header state of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPolicy {
    host: String,
    content_length: Option<u64>,
    content_type: Option<String>,
}

impl RequestPolicy {
    pub(crate) fn new(host: String, has_body: bool) -> Self {
        Self { host, content_length: has_body.then_some(0), content_type: None }
    }

    pub(crate) fn set_content_length(&mut self, length: u64) {
        if let Some(current) = &mut self.content_length {
            *current = length;
        }
    }
}

impl HeaderPolicy for RequestPolicy {
    const MUTABLE: bool = true;

    fn access(header: PseudoHeader) -> Access {
        match header {
            PseudoHeader::AcceptCharset => Access::Fixed("utf-8"),
            PseudoHeader::AcceptEncoding => Access::Fixed("identity"),
            PseudoHeader::Connection => Access::Fixed("close"),
            PseudoHeader::ContentLength | PseudoHeader::Host => Access::Derived,
            PseudoHeader::ContentType => Access::Settable,
            PseudoHeader::Date
            | PseudoHeader::Expires
            | PseudoHeader::IfModifiedSince
            | PseudoHeader::TransferEncoding
            | PseudoHeader::KeepAlive => Access::Unsupported,
        }
    }

    fn value(&self, header: PseudoHeader, _fields: &FieldMap) -> Option<String> {
        match header {
            PseudoHeader::ContentLength => self.content_length.map(|length| length.to_string()),
            PseudoHeader::ContentType => self.content_type.clone(),
            PseudoHeader::Host => Some(self.host.clone()),
            _ => None,
        }
    }

    fn store(&mut self, header: PseudoHeader, value: Option<String>) {
        if header == PseudoHeader::ContentType {
            self.content_type = value;
        }
    }
}

/// Pseudo-header view over the fields of a received response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponsePolicy;

impl HeaderPolicy for ResponsePolicy {
    const MUTABLE: bool = false;

    fn access(_header: PseudoHeader) -> Access {
        Access::Derived
    }

    fn value(&self, header: PseudoHeader, fields: &FieldMap) -> Option<String> {
        let values = fields.get(header.as_str())?;
        match header {
            PseudoHeader::ContentLength => single(values)?.parse::<u64>().ok().map(|length| length.to_string()),
            PseudoHeader::Date | PseudoHeader::Expires | PseudoHeader::IfModifiedSince => {
                httpdate::parse_http_date(single(values)?).ok().map(httpdate::fmt_http_date)
            }
            PseudoHeader::Host => single(values).map(ToString::to_string),
            _ => Some(distinct(values).join(", ")),
        }
    }

    /// The computed value when the field holds a single distinct value that parses,
    /// the received values otherwise.
    fn values(&self, header: PseudoHeader, fields: &FieldMap) -> Option<Vec<String>> {
        let received = distinct(fields.get(header.as_str())?);
        if let [_] = received.as_slice()
            && let Some(value) = self.value(header, fields)
        {
            return Some(vec![value]);
        }
        Some(received)
    }

    fn store(&mut self, _header: PseudoHeader, _value: Option<String>) {}
}

/// The value of a field that was received once, or repeated with the same value.
fn single(values: &[String]) -> Option<&str> {
    let (first, rest) = values.split_first()?;
    let first = first.trim();
    rest.iter().all(|value| value.trim() == first).then_some(first)
}

fn distinct(values: &[String]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|value| value.trim()) {
        if !distinct.iter().any(|seen| seen == value) {
            distinct.push(value.to_string());
        }
    }
    distinct
}

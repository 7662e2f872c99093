use http::{StatusCode, Version};

use crate::protocol::ResponseHeaders;

/// A fully received response.
///
/// Built once decoding is complete, never modified afterwards.
#[derive(Debug, Clone)]
pub struct Response {
    version: Version,
    status: StatusCode,
    reason_phrase: String,
    headers: ResponseHeaders,
    body: String,
}

impl Response {
    pub(crate) fn new(version: Version, status: StatusCode, reason_phrase: String, headers: ResponseHeaders, body: String) -> Self {
        Self { version, status, reason_phrase, headers, body }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// The reason phrase exactly as the server sent it, possibly empty.
    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// Value of the `content-length` header, `None` when missing or unparsable.
    pub fn content_length(&self) -> Option<u64> {
        self.headers.content_length()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

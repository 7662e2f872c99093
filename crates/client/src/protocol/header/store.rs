use std::time::SystemTime;

use http::{HeaderName, HeaderValue};
use mime::Mime;

use super::{Access, FieldMap, HeaderPolicy, PseudoHeader, RequestPolicy, ResponsePolicy};
use crate::ensure;
use crate::protocol::HeaderError;

/// Header collection of an outgoing request.
pub type RequestHeaders = HeaderStore<RequestPolicy>;

/// Header collection of a received response, every mutator fails.
///
/// A pseudo-header received once (or repeated with the same value) reads as its
/// normalized value. One received with conflicting or unparsable values reads as the
/// values sent by the peer, while its typed accessor, such as
/// [`expires`](HeaderStore::expires), returns `None`.
pub type ResponseHeaders = HeaderStore<ResponsePolicy>;

/// A header collection with computed pseudo-headers.
///
/// Free-form headers live in an ordered [`FieldMap`]. Names listed in [`PseudoHeader`]
/// never read from that map: their value always comes from the policy `P`, which also
/// decides whether they (and the store as a whole) may be modified.
#[derive(Debug, Clone)]
pub struct HeaderStore<P> {
    fields: FieldMap,
    policy: P,
}

impl<P: HeaderPolicy> HeaderStore<P> {
    pub(crate) fn from_parts(fields: FieldMap, policy: P) -> Self {
        Self { fields, policy }
    }

    pub(crate) fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    fn pseudo_value(&self, header: PseudoHeader) -> Option<String> {
        match P::access(header) {
            Access::Fixed(value) => Some(value.to_string()),
            Access::Unsupported => None,
            Access::Derived | Access::Settable => self.policy.value(header, &self.fields),
        }
    }

    fn pseudo_values(&self, header: PseudoHeader) -> Option<Vec<String>> {
        match P::access(header) {
            Access::Fixed(value) => Some(vec![value.to_string()]),
            Access::Unsupported => None,
            Access::Derived | Access::Settable => self.policy.values(header, &self.fields),
        }
    }

    /// Returns every value of `name`, or `None` when the header is absent.
    pub fn get(&self, name: &str) -> Option<Vec<String>> {
        match PseudoHeader::from_name(name) {
            Some(header) => self.pseudo_values(header),
            None => self.fields.get(name).map(<[String]>::to_vec),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match PseudoHeader::from_name(name) {
            Some(header) => self.pseudo_values(header).is_some(),
            None => self.fields.contains(name),
        }
    }

    /// Returns the value of `name` if it has at most one.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::Ambiguous`] when more than one value is present.
    pub fn value_if_single(&self, name: &str) -> Result<Option<String>, HeaderError> {
        let Some(mut values) = self.get(name) else {
            return Ok(None);
        };
        ensure!(values.len() == 1, HeaderError::ambiguous(name.trim().to_ascii_lowercase(), values.len()));
        Ok(values.pop())
    }

    pub fn add(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = self.check_mutation(name)?;
        let value = validate_value(&name, value)?;
        match PseudoHeader::from_name(&name) {
            Some(header) => {
                self.check_pseudo(header)?;
                self.policy.store(header, Some(value));
            }
            None => self.fields.append(&name, value),
        }
        Ok(())
    }

    /// Removes a single `value` of `name`, doing nothing when it isn't present.
    pub fn remove(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = self.check_mutation(name)?;
        match PseudoHeader::from_name(&name) {
            Some(header) => {
                self.check_pseudo(header)?;
                if self.pseudo_value(header).as_deref() == Some(value.trim()) {
                    self.policy.store(header, None);
                }
            }
            None => {
                self.fields.remove(&name, value.trim());
            }
        }
        Ok(())
    }

    pub fn remove_all(&mut self, name: &str) -> Result<(), HeaderError> {
        let name = self.check_mutation(name)?;
        match PseudoHeader::from_name(&name) {
            Some(header) => {
                self.check_pseudo(header)?;
                self.policy.store(header, None);
            }
            None => {
                self.fields.remove_all(&name);
            }
        }
        Ok(())
    }

    /// Replaces all values of `name` with `value`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.remove_all(name)?;
        self.add(name, value)
    }

    /// Removes every free-form header and every settable pseudo-header.
    pub fn clear(&mut self) -> Result<(), HeaderError> {
        ensure!(P::MUTABLE, HeaderError::immutable("*"));
        self.fields.clear();
        for header in PseudoHeader::ALL {
            if P::access(header) == Access::Settable {
                self.policy.store(header, None);
            }
        }
        Ok(())
    }

    /// Visits every present header once.
    ///
    /// Pseudo-headers come first, in [`PseudoHeader::ALL`] order, followed by the
    /// free-form headers in insertion order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &[String]),
    {
        for header in PseudoHeader::ALL {
            if let Some(values) = self.pseudo_values(header) {
                visit(header.as_str(), &values);
            }
        }

        for (name, values) in self.fields.iter() {
            if PseudoHeader::from_name(name).is_none() {
                visit(name, values);
            }
        }
    }

    /// Collects the headers in [`for_each`](Self::for_each) order.
    pub fn to_vec(&self) -> Vec<(String, Vec<String>)> {
        let mut headers = Vec::new();
        self.for_each(|name, values| headers.push((name.to_string(), values.to_vec())));
        headers
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, Vec<String>)> {
        self.to_vec().into_iter()
    }

    /// Number of distinct header names that would be visited.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.for_each(|_, _| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_mutation(&self, name: &str) -> Result<String, HeaderError> {
        let name = name.trim();
        ensure!(P::MUTABLE, HeaderError::immutable(name.to_ascii_lowercase()));
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_e| HeaderError::InvalidName { name: name.to_string() })?;
        Ok(header_name.as_str().to_string())
    }

    fn check_pseudo(&self, header: PseudoHeader) -> Result<(), HeaderError> {
        match P::access(header) {
            Access::Settable => Ok(()),
            Access::Fixed(_) | Access::Derived => Err(HeaderError::read_only(header.as_str())),
            Access::Unsupported => Err(HeaderError::unsupported(header.as_str())),
        }
    }
}

fn validate_value(name: &str, value: &str) -> Result<String, HeaderError> {
    let value = value.trim();
    HeaderValue::from_str(value)
        .map(|_| value.to_string())
        .map_err(|_e| HeaderError::InvalidValue { name: name.to_string(), value: value.to_string() })
}

impl RequestHeaders {
    pub fn content_length(&self) -> Option<u64> {
        self.pseudo_value(PseudoHeader::ContentLength).and_then(|value| value.parse().ok())
    }

    pub fn content_type(&self) -> Option<Mime> {
        self.pseudo_value(PseudoHeader::ContentType).and_then(|value| value.parse().ok())
    }

    pub fn set_content_type(&mut self, content_type: &Mime) -> Result<(), HeaderError> {
        self.set(PseudoHeader::ContentType.as_str(), content_type.as_ref())
    }

    pub fn host(&self) -> Option<String> {
        self.pseudo_value(PseudoHeader::Host)
    }
}

impl ResponseHeaders {
    pub(crate) fn from_fields(fields: FieldMap) -> Self {
        Self::from_parts(fields, ResponsePolicy)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.pseudo_value(PseudoHeader::ContentLength).and_then(|value| value.parse().ok())
    }

    pub fn content_type(&self) -> Option<Mime> {
        self.pseudo_value(PseudoHeader::ContentType).and_then(|value| value.parse().ok())
    }

    pub fn date(&self) -> Option<SystemTime> {
        self.http_date(PseudoHeader::Date)
    }

    pub fn expires(&self) -> Option<SystemTime> {
        self.http_date(PseudoHeader::Expires)
    }

    pub fn if_modified_since(&self) -> Option<SystemTime> {
        self.http_date(PseudoHeader::IfModifiedSince)
    }

    fn http_date(&self, header: PseudoHeader) -> Option<SystemTime> {
        self.pseudo_value(header).and_then(|value| httpdate::parse_http_date(&value).ok())
    }

    /// Host part of the `host` header, without the port.
    pub fn host(&self) -> Option<String> {
        let value = self.pseudo_value(PseudoHeader::Host)?;
        let authority = value.parse::<http::uri::Authority>().ok()?;
        Some(authority.host().to_string())
    }

    /// Port part of the `host` header, if one is given.
    pub fn port(&self) -> Option<u16> {
        let value = self.pseudo_value(PseudoHeader::Host)?;
        value.parse::<http::uri::Authority>().ok()?.port_u16()
    }

    /// Whether the peer asked to keep the connection open.
    pub fn persistent_connection(&self) -> bool {
        self.pseudo_value(PseudoHeader::Connection)
            .is_some_and(|value| value.split(',').any(|token| token.trim().eq_ignore_ascii_case("keep-alive")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request_headers() -> RequestHeaders {
        HeaderStore::from_parts(FieldMap::new(), RequestPolicy::new("localhost:8080".to_string(), true))
    }

    fn response_headers() -> ResponseHeaders {
        let mut fields = FieldMap::new();
        fields.append("server", "micro");
        fields.append("content-length", "11");
        fields.append("content-type", "text/plain; charset=utf-8");
        fields.append("date", "Sun, 06 Nov 1994 08:49:37 GMT");
        fields.append("host", "example.com:8080");
        fields.append("connection", "keep-alive");
        fields.append("x-trace", "a");
        fields.append("x-trace", "b");
        ResponseHeaders::from_fields(fields)
    }

    #[test]
    fn request_fixed_headers() {
        let headers = request_headers();
        assert_eq!(headers.get("accept-charset"), Some(vec!["utf-8".to_string()]));
        assert_eq!(headers.get("Accept-Encoding"), Some(vec!["identity".to_string()]));
        assert_eq!(headers.get("connection"), Some(vec!["close".to_string()]));
        assert_eq!(headers.get("host"), Some(vec!["localhost:8080".to_string()]));
        assert_eq!(headers.get("date"), None);
    }

    #[test]
    fn request_read_only_headers_reject_mutation() {
        let mut headers = request_headers();

        for name in ["host", "content-length", "connection", "accept-charset", "accept-encoding"] {
            let error = headers.set(name, "x").unwrap_err();
            assert_eq!(error, HeaderError::read_only(name));
            assert!(error.is_unsupported_operation());
        }

        for name in ["date", "expires", "if-modified-since", "transfer-encoding", "keep-alive"] {
            assert_eq!(headers.add(name, "x").unwrap_err(), HeaderError::unsupported(name));
            assert_eq!(headers.remove_all(name).unwrap_err(), HeaderError::unsupported(name));
        }
    }

    #[test]
    fn request_content_type_is_settable() {
        let mut headers = request_headers();
        assert_eq!(headers.get("content-type"), None);

        headers.add("Content-Type", "text/plain").unwrap();
        assert_eq!(headers.value_if_single("content-type").unwrap().as_deref(), Some("text/plain"));

        headers.set_content_type(&mime::APPLICATION_JSON).unwrap();
        assert_eq!(headers.content_type(), Some(mime::APPLICATION_JSON));

        headers.remove("content-type", "text/plain").unwrap();
        assert!(headers.contains("content-type"));
        headers.remove("content-type", "application/json").unwrap();
        assert!(!headers.contains("content-type"));
    }

    #[test]
    fn free_form_headers_are_multi_valued() {
        let mut headers = request_headers();
        headers.add("X-Token", "1").unwrap();
        headers.add("x-token", "2").unwrap();

        assert_eq!(headers.get("X-TOKEN"), Some(vec!["1".to_string(), "2".to_string()]));
        assert_eq!(headers.value_if_single("x-token").unwrap_err(), HeaderError::ambiguous("x-token", 2));

        headers.set("x-token", "3").unwrap();
        assert_eq!(headers.value_if_single("x-token").unwrap().as_deref(), Some("3"));

        headers.remove("x-token", "3").unwrap();
        assert_eq!(headers.get("x-token"), None);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mut headers = request_headers();
        assert!(matches!(headers.add("bad name", "v"), Err(HeaderError::InvalidName { .. })));
        assert!(matches!(headers.add("x-inject", "a\r\nb: c"), Err(HeaderError::InvalidValue { .. })));
    }

    #[test]
    fn clear_keeps_computed_headers() {
        let mut headers = request_headers();
        headers.add("x-a", "1").unwrap();
        headers.add("content-type", "text/plain").unwrap();

        headers.clear().unwrap();
        assert_eq!(headers.get("x-a"), None);
        assert_eq!(headers.get("content-type"), None);
        assert_eq!(headers.get("host"), Some(vec!["localhost:8080".to_string()]));
    }

    #[test]
    fn for_each_visits_pseudo_headers_first() {
        let mut headers = request_headers();
        headers.add("x-b", "1").unwrap();
        headers.add("x-a", "2").unwrap();
        headers.add("content-type", "text/plain").unwrap();

        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["accept-charset", "accept-encoding", "connection", "content-length", "content-type", "host", "x-b", "x-a"]
        );
        assert_eq!(headers.len(), 8);
    }

    #[test]
    fn response_headers_are_immutable() {
        let mut headers = response_headers();

        let pseudo_names = PseudoHeader::ALL.map(|header| header.as_str());
        for name in pseudo_names.into_iter().chain(["x-trace", "x-new"]) {
            assert_eq!(headers.add(name, "1").unwrap_err(), HeaderError::immutable(name));
            assert_eq!(headers.set(name, "1").unwrap_err(), HeaderError::immutable(name));
            assert_eq!(headers.remove(name, "1").unwrap_err(), HeaderError::immutable(name));
            assert_eq!(headers.remove_all(name).unwrap_err(), HeaderError::immutable(name));
        }
        assert!(headers.clear().unwrap_err().is_unsupported_operation());
        assert_eq!(headers.get("server"), Some(vec!["micro".to_string()]));
    }

    #[test]
    fn response_pseudo_header_with_conflicting_values_is_ambiguous() {
        let mut fields = FieldMap::new();
        fields.append("date", "Sun, 06 Nov 1994 08:49:37 GMT");
        fields.append("date", "Mon, 07 Nov 1994 08:49:37 GMT");
        let headers = ResponseHeaders::from_fields(fields);

        assert_eq!(headers.value_if_single("date").unwrap_err(), HeaderError::ambiguous("date", 2));
        assert_eq!(headers.get("date").map(|values| values.len()), Some(2));
        assert_eq!(headers.date(), None);
        assert!(headers.to_vec().iter().any(|(name, values)| name == "date" && values.len() == 2));
    }

    #[test]
    fn response_repeated_content_length_reads_as_single() {
        let mut fields = FieldMap::new();
        fields.append("content-length", "5");
        fields.append("content-length", "5");
        let headers = ResponseHeaders::from_fields(fields);

        assert_eq!(headers.content_length(), Some(5));
        assert_eq!(headers.get("content-length"), Some(vec!["5".to_string()]));
        assert_eq!(headers.value_if_single("content-length").unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn response_unparsable_pseudo_header_stays_visible() {
        let mut fields = FieldMap::new();
        fields.append("expires", "0");
        let headers = ResponseHeaders::from_fields(fields);

        assert_eq!(headers.expires(), None);
        assert_eq!(headers.get("expires"), Some(vec!["0".to_string()]));
        assert_eq!(headers.to_vec(), vec![("expires".to_string(), vec!["0".to_string()])]);
    }

    #[test]
    fn response_typed_accessors() {
        let headers = response_headers();

        assert_eq!(headers.content_length(), Some(11));
        assert_eq!(headers.content_type().map(|mime| mime.essence_str().to_string()).as_deref(), Some("text/plain"));
        assert_eq!(headers.date(), Some(SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777)));
        assert_eq!(headers.expires(), None);
        assert_eq!(headers.host().as_deref(), Some("example.com"));
        assert_eq!(headers.port(), Some(8080));
        assert!(headers.persistent_connection());
        assert_eq!(headers.value_if_single("x-trace").unwrap_err(), HeaderError::ambiguous("x-trace", 2));
    }

    #[test]
    fn response_for_each_does_not_duplicate_names() {
        let headers = response_headers();
        let names: Vec<_> = headers.to_vec().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["connection", "content-length", "content-type", "host", "date", "server", "x-trace"]);
    }
}

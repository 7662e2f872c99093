//! Header collections for requests and responses.
//!
//! Both directions share one implementation, [`HeaderStore`], an ordered multi-map
//! of free-form fields wrapped by a [`HeaderPolicy`]:
//!
//! - [`RequestHeaders`]: mutable; `accept-charset`, `accept-encoding` and `connection`
//!   are fixed, `host` and `content-length` are derived from the request, only
//!   `content-type` can be set
//! - [`ResponseHeaders`]: immutable; pseudo-headers are parsed from the received
//!   fields, every mutator fails
//!
//! Pseudo-header behavior is looked up in a single table, see [`PseudoHeader`] and
//! [`Access`].

mod field_map;
mod policy;
mod pseudo;
mod store;

pub use field_map::FieldMap;
pub use policy::{HeaderPolicy, RequestPolicy, ResponsePolicy};
pub use pseudo::{Access, PseudoHeader};
pub use store::{HeaderStore, RequestHeaders, ResponseHeaders};

//! Foundation types for the documentation server.
//!
//! Every other docserver crate depends on `docserver-types`. The types here
//! are plain data: they carry no storage or transport behavior.
//!
//! # Key Types
//!
//! - [`BundleId`] / [`RevisionId`]: UUID v7 identifiers, never reused
//! - [`Bundle`]: a named documentation collection and its attached tags
//! - [`Revision`]: a tagged pointer at a documentation source
//! - [`BundleQuery`]: the substring filter used by bundle search
//! - [`DetailValue`]: dynamically-typed JSON attached to error responses

pub mod bundle;
pub mod detail;
pub mod error;
pub mod identity;
pub mod query;
pub mod revision;

pub use bundle::{Bundle, BundleMetadata};
pub use detail::DetailValue;
pub use error::TypeError;
pub use identity::{BundleId, RevisionId};
pub use query::BundleQuery;
pub use revision::{validate_tag, Revision};

/// Re-exported so downstream crates name revision sources without a direct
/// dependency on `url`.
pub use url::Url;

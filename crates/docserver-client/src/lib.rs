//! Client SDK for the documentation server.
//!
//! [`RemoteRepository`] implements
//! [`DocumentationRepository`](docserver_repository::DocumentationRepository)
//! over HTTP with the same observable semantics as the in-memory store.
//! [`Bootstrap`] makes sure a server is reachable before a caller starts
//! issuing requests, either by attaching to a running instance or by
//! launching one in the background.

pub mod bootstrap;
pub mod error;
mod http;
pub mod remote;

#[cfg(test)]
mod conformance;

pub use bootstrap::{with_timeout, Bootstrap, BootstrapConfig, HealthCheck, ServerHandle};
pub use error::{BootstrapError, BootstrapResult, BoxError};
pub use remote::RemoteRepository;

// Re-export the interface so SDK users need a single dependency.
pub use docserver_repository::{DocumentationRepository, RepositoryError, RepositoryResult};
pub use docserver_types::{Bundle, BundleId, BundleMetadata, BundleQuery, Revision, Url};

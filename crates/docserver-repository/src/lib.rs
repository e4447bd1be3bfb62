//! Documentation repository abstraction.
//!
//! A repository stores documentation bundles and the tagged revisions
//! attached to them. Callers program against [`DocumentationRepository`] and
//! never learn whether the bundles live in local memory or behind an HTTP
//! server.
//!
//! # Modules
//!
//! - [`error`]: [`RepositoryError`] and the [`RepositoryResult`] alias
//! - [`traits`]: The [`DocumentationRepository`] trait
//! - [`memory`]: [`InMemoryRepository`], the authoritative in-process store

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use memory::InMemoryRepository;
pub use traits::{DocumentationRepository, SharedRepository};

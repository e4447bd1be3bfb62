//! HTTP server for the documentation server.
//!
//! Hosts a set of documentation services under `/api/<service>` and a
//! `/status` endpoint that lists them. The repository service is a direct
//! REST projection of [`docserver_repository::DocumentationRepository`].

pub mod config;
pub mod error;
pub mod handler;
pub mod repository;
pub mod router;
pub mod server;
pub mod service;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use server::DocServer;
pub use service::{DocumentationService, RepositoryService};

use axum::Router;

use docserver_protocol::ServiceId;
use docserver_repository::SharedRepository;

use crate::repository;

/// A group of routes mounted under `/api/<id>`.
pub trait DocumentationService: Send + Sync {
    fn id(&self) -> ServiceId;

    /// Routes relative to the mount point.
    fn router(&self) -> Router;
}

/// Serves a [`SharedRepository`] over HTTP.
#[derive(Clone)]
pub struct RepositoryService {
    repository: SharedRepository,
}

impl RepositoryService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

impl DocumentationService for RepositoryService {
    fn id(&self) -> ServiceId {
        ServiceId::repository()
    }

    fn router(&self) -> Router {
        repository::routes(self.repository.clone())
    }
}

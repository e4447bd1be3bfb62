//! The [`DocumentationRepository`] trait defining the repository interface.
//!
//! The in-memory store and the HTTP client both implement this trait, and
//! both must produce the same observable results for the same sequence of
//! calls.

use std::sync::Arc;

use async_trait::async_trait;
use docserver_types::{Bundle, BundleId, BundleQuery, Revision, Url};

use crate::error::{RepositoryError, RepositoryResult};

/// Storage-agnostic CRUD over documentation bundles and their revisions.
///
/// Implementations must be thread-safe (`Send + Sync`). Every mutating call
/// is atomic with respect to every other call on the same repository.
#[async_trait]
pub trait DocumentationRepository: Send + Sync {
    /// Create a bundle with a fresh id and no revisions.
    async fn add_bundle(
        &self,
        display_name: &str,
        bundle_identifier: &str,
    ) -> RepositoryResult<Bundle>;

    /// Look up a bundle by id.
    ///
    /// Returns `Ok(None)` if no such bundle exists.
    async fn bundle(&self, id: BundleId) -> RepositoryResult<Option<Bundle>>;

    /// All bundles matching `query`.
    ///
    /// Order is stable for equal inputs and otherwise unspecified; sort on
    /// the caller side when a particular order matters.
    async fn search(&self, query: &BundleQuery) -> RepositoryResult<Vec<Bundle>>;

    /// All bundles.
    async fn bundles(&self) -> RepositoryResult<Vec<Bundle>> {
        self.search(&BundleQuery::all()).await
    }

    /// Change a bundle's display name. Reserved; no implementation supports it.
    async fn update_bundle(
        &self,
        _id: BundleId,
        _display_name: Option<String>,
    ) -> RepositoryResult<Bundle> {
        Err(RepositoryError::NotImplemented {
            operation: "update bundle",
        })
    }

    /// Remove a bundle and every revision attached to it.
    ///
    /// Removing an unknown bundle is a no-op.
    async fn remove_bundle(&self, id: BundleId) -> RepositoryResult<()>;

    /// Attach `source` to the bundle under `tag`, replacing any revision that
    /// already holds the tag.
    ///
    /// Fails if the bundle does not exist.
    async fn add_revision(
        &self,
        tag: &str,
        source: Url,
        bundle_id: BundleId,
    ) -> RepositoryResult<Revision>;

    /// Look up the revision tagged `tag` on a bundle.
    ///
    /// Returns `Ok(None)` if either the bundle or the tag is unknown.
    async fn revision(&self, tag: &str, bundle_id: BundleId)
        -> RepositoryResult<Option<Revision>>;

    /// Detach the revision tagged `tag`. Unknown bundles and tags are a no-op.
    async fn remove_revision(&self, tag: &str, bundle_id: BundleId) -> RepositoryResult<()>;
}

/// A repository shared across tasks and request handlers.
pub type SharedRepository = Arc<dyn DocumentationRepository>;

#[async_trait]
impl<R: DocumentationRepository + ?Sized> DocumentationRepository for Arc<R> {
    async fn add_bundle(
        &self,
        display_name: &str,
        bundle_identifier: &str,
    ) -> RepositoryResult<Bundle> {
        (**self).add_bundle(display_name, bundle_identifier).await
    }

    async fn bundle(&self, id: BundleId) -> RepositoryResult<Option<Bundle>> {
        (**self).bundle(id).await
    }

    async fn search(&self, query: &BundleQuery) -> RepositoryResult<Vec<Bundle>> {
        (**self).search(query).await
    }

    async fn update_bundle(
        &self,
        id: BundleId,
        display_name: Option<String>,
    ) -> RepositoryResult<Bundle> {
        (**self).update_bundle(id, display_name).await
    }

    async fn remove_bundle(&self, id: BundleId) -> RepositoryResult<()> {
        (**self).remove_bundle(id).await
    }

    async fn add_revision(
        &self,
        tag: &str,
        source: Url,
        bundle_id: BundleId,
    ) -> RepositoryResult<Revision> {
        (**self).add_revision(tag, source, bundle_id).await
    }

    async fn revision(
        &self,
        tag: &str,
        bundle_id: BundleId,
    ) -> RepositoryResult<Option<Revision>> {
        (**self).revision(tag, bundle_id).await
    }

    async fn remove_revision(&self, tag: &str, bundle_id: BundleId) -> RepositoryResult<()> {
        (**self).remove_revision(tag, bundle_id).await
    }
}

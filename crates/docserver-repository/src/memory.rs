//! In-memory documentation repository.
//!
//! [`InMemoryRepository`] is the authoritative store behind a documentation
//! server. Both of its maps live in a single [`State`] guarded by one
//! `RwLock`, so every operation observes and produces a linearized view:
//! writers hold the write lock for their entire read-modify-write sequence,
//! readers share the read lock, and no lock is ever held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use docserver_types::{validate_tag, Bundle, BundleId, BundleMetadata, BundleQuery, Revision, Url};
use tracing::debug;

use crate::error::{RepositoryError, RepositoryResult};
use crate::traits::DocumentationRepository;

#[derive(Debug, Default)]
struct State {
    bundles: BTreeMap<BundleId, BundleMetadata>,
    revisions: BTreeMap<BundleId, BTreeMap<String, Revision>>,
}

impl State {
    fn materialize(&self, id: BundleId, metadata: &BundleMetadata) -> Bundle {
        let revisions = self
            .revisions
            .get(&id)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default();
        Bundle {
            id,
            metadata: metadata.clone(),
            revisions,
        }
    }
}

/// An in-memory implementation of [`DocumentationRepository`].
///
/// Data is lost when the repository is dropped. Bundles are listed in id
/// order, which for v7 ids is creation order.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| RepositoryError::Internal(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| RepositoryError::Internal(format!("lock poisoned: {e}")))
    }

    /// Number of stored bundles.
    pub fn bundle_count(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.bundles.len())
    }

    /// Number of revisions attached to a bundle, `None` if the bundle is unknown.
    pub fn revision_count(&self, bundle_id: BundleId) -> RepositoryResult<Option<usize>> {
        let state = self.read()?;
        if !state.bundles.contains_key(&bundle_id) {
            return Ok(None);
        }
        Ok(Some(state.revisions.get(&bundle_id).map_or(0, BTreeMap::len)))
    }
}

#[async_trait]
impl DocumentationRepository for InMemoryRepository {
    async fn add_bundle(
        &self,
        display_name: &str,
        bundle_identifier: &str,
    ) -> RepositoryResult<Bundle> {
        let metadata = BundleMetadata::new(display_name, bundle_identifier);
        let mut state = self.write()?;

        let mut id = BundleId::new();
        while state.bundles.contains_key(&id) {
            id = BundleId::new();
        }

        state.bundles.insert(id, metadata.clone());
        state.revisions.insert(id, BTreeMap::new());
        debug!(%id, display_name, bundle_identifier, "added bundle");
        Ok(Bundle::new(id, metadata))
    }

    async fn bundle(&self, id: BundleId) -> RepositoryResult<Option<Bundle>> {
        let state = self.read()?;
        Ok(state
            .bundles
            .get(&id)
            .map(|metadata| state.materialize(id, metadata)))
    }

    async fn search(&self, query: &BundleQuery) -> RepositoryResult<Vec<Bundle>> {
        let state = self.read()?;
        Ok(state
            .bundles
            .iter()
            .filter(|(_, metadata)| query.matches(metadata))
            .map(|(id, metadata)| state.materialize(*id, metadata))
            .collect())
    }

    async fn remove_bundle(&self, id: BundleId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let existed = state.bundles.remove(&id).is_some();
        state.revisions.remove(&id);
        debug!(%id, existed, "removed bundle");
        Ok(())
    }

    async fn add_revision(
        &self,
        tag: &str,
        source: Url,
        bundle_id: BundleId,
    ) -> RepositoryResult<Revision> {
        validate_tag(tag)?;
        let mut state = self.write()?;
        if !state.bundles.contains_key(&bundle_id) {
            return Err(RepositoryError::BundleNotFound { id: bundle_id });
        }

        let revision = Revision::new(tag, source, bundle_id);
        let replaced = state
            .revisions
            .entry(bundle_id)
            .or_default()
            .insert(tag.to_string(), revision.clone())
            .is_some();
        debug!(%bundle_id, tag, replaced, "added revision");
        Ok(revision)
    }

    async fn revision(
        &self,
        tag: &str,
        bundle_id: BundleId,
    ) -> RepositoryResult<Option<Revision>> {
        let state = self.read()?;
        Ok(state
            .revisions
            .get(&bundle_id)
            .and_then(|tags| tags.get(tag))
            .cloned())
    }

    async fn remove_revision(&self, tag: &str, bundle_id: BundleId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let existed = state
            .revisions
            .get_mut(&bundle_id)
            .and_then(|tags| tags.remove(tag))
            .is_some();
        debug!(%bundle_id, tag, existed, "removed revision");
        Ok(())
    }
}

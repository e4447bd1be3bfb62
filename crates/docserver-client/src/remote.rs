//! HTTP-backed documentation repository.
//!
//! Every method issues one request against the routes served by
//! `docserver-server` and maps the response back onto the repository
//! contract: a 404 on `bundle`/`revision` becomes `Ok(None)`, and every other
//! non-2xx response surfaces as [`RepositoryError::Status`]. Failed calls are
//! never retried.
//!
//! Tags that cannot be a URL path segment (empty, `.` and `..`) are never
//! sent: adding one fails locally, and looking one up or removing it behaves
//! as for any unknown tag.

use async_trait::async_trait;
use reqwest::Method;

use docserver_protocol::{
    endpoints, CreateBundleRequest, CreateRevisionRequest, SearchParams, UpdateBundleRequest,
};
use docserver_repository::{DocumentationRepository, RepositoryError, RepositoryResult};
use docserver_types::{validate_tag, Bundle, BundleId, BundleQuery, Revision, Url};

use crate::http::HttpClient;

/// A [`DocumentationRepository`] living behind a documentation server.
#[derive(Clone, Debug)]
pub struct RemoteRepository {
    http: HttpClient,
}

impl RemoteRepository {
    /// Connect to the server at `base_url`, e.g. `http://127.0.0.1:1234`.
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use an existing `reqwest` client (shared connection pool, proxies...).
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http: HttpClient::new(client, base_url),
        }
    }

    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    fn repository_url(&self, rest: &[&str]) -> RepositoryResult<Url> {
        let prefix = endpoints::REPOSITORY.split('/').filter(|s| !s.is_empty());
        self.http.url(prefix.chain(rest.iter().copied()))
    }
}

/// Map a 404 onto an absent result, keeping every other outcome.
fn absent_on_not_found<T>(result: RepositoryResult<T>) -> RepositoryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RepositoryError::Status { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl DocumentationRepository for RemoteRepository {
    async fn add_bundle(
        &self,
        display_name: &str,
        bundle_identifier: &str,
    ) -> RepositoryResult<Bundle> {
        let url = self.repository_url(&[])?;
        let body = CreateBundleRequest {
            display_name: display_name.to_string(),
            bundle_identifier: bundle_identifier.to_string(),
        };
        self.http
            .json(self.http.builder(Method::POST, url).json(&body))
            .await
    }

    async fn bundle(&self, id: BundleId) -> RepositoryResult<Option<Bundle>> {
        let url = self.repository_url(&[&id.to_string()])?;
        absent_on_not_found(self.http.json(self.http.builder(Method::GET, url)).await)
    }

    async fn search(&self, query: &BundleQuery) -> RepositoryResult<Vec<Bundle>> {
        let url = self.repository_url(&[])?;
        let params = SearchParams::from(query);
        self.http
            .json(self.http.builder(Method::GET, url).query(&params))
            .await
    }

    async fn update_bundle(
        &self,
        id: BundleId,
        display_name: Option<String>,
    ) -> RepositoryResult<Bundle> {
        let url = self.repository_url(&[&id.to_string()])?;
        let body = UpdateBundleRequest { display_name };
        self.http
            .json(self.http.builder(Method::PATCH, url).json(&body))
            .await
    }

    async fn remove_bundle(&self, id: BundleId) -> RepositoryResult<()> {
        let url = self.repository_url(&[&id.to_string()])?;
        self.http.empty(self.http.builder(Method::DELETE, url)).await
    }

    async fn add_revision(
        &self,
        tag: &str,
        source: Url,
        bundle_id: BundleId,
    ) -> RepositoryResult<Revision> {
        validate_tag(tag)?;
        let url = self.repository_url(&[&bundle_id.to_string()])?;
        let body = CreateRevisionRequest {
            tag: tag.to_string(),
            source,
        };
        self.http
            .json(self.http.builder(Method::POST, url).json(&body))
            .await
    }

    async fn revision(
        &self,
        tag: &str,
        bundle_id: BundleId,
    ) -> RepositoryResult<Option<Revision>> {
        if validate_tag(tag).is_err() {
            return Ok(None);
        }
        let url = self.repository_url(&[&bundle_id.to_string(), tag])?;
        absent_on_not_found(self.http.json(self.http.builder(Method::GET, url)).await)
    }

    async fn remove_revision(&self, tag: &str, bundle_id: BundleId) -> RepositoryResult<()> {
        if validate_tag(tag).is_err() {
            return Ok(());
        }
        let url = self.repository_url(&[&bundle_id.to_string(), tag])?;
        self.http.empty(self.http.builder(Method::DELETE, url)).await
    }
}

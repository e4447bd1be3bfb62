use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use docserver_protocol::ErrorResponse;
use docserver_repository::{RepositoryError, RepositoryResult};
use docserver_types::{DetailValue, Url};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin JSON-over-HTTP layer shared by the remote repository.
#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    pub(crate) fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { base_url, client }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    ///
    /// Empty and dot segments cannot survive URL normalization, so they are
    /// refused rather than silently addressing a parent resource.
    pub(crate) fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> RepositoryResult<Url> {
        let segments: Vec<&str> = segments.into_iter().collect();
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(RepositoryError::Internal(format!(
                "cannot address path segment {segment:?}"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Transport(format!("not a base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn builder(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).timeout(REQUEST_TIMEOUT)
    }

    /// Send a request and decode a JSON response body.
    pub(crate) async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    /// Send a request whose success response carries no body of interest.
    pub(crate) async fn empty(&self, request: RequestBuilder) -> RepositoryResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;
        tracing::debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "documentation server responded"
        );
        raise_status(response).await
    }
}

/// Turn a non-2xx response into [`RepositoryError::Status`], decoding the
/// error body when there is one.
async fn raise_status(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.bytes().await {
        Ok(body) if body.is_empty() => None,
        Ok(body) => match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(error) => error.detail,
            Err(e) => Some(DetailValue::from(format!("failed to decode error: {e}"))),
        },
        Err(_) => Some(DetailValue::from("failed to load body")),
    };

    Err(RepositoryError::Status {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_appends_segments() {
        let c = client("http://127.0.0.1:1234");
        let url = c.url(["api", "repository"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/api/repository");
    }

    #[test]
    fn url_keeps_base_path() {
        let c = client("http://docs.example.com/mirror/");
        let url = c.url(["api", "repository", "x"]).unwrap();
        assert_eq!(url.as_str(), "http://docs.example.com/mirror/api/repository/x");
    }

    #[test]
    fn url_percent_encodes_tags() {
        let c = client("http://127.0.0.1:1234");
        let url = c.url(["api", "repository", "id", "feature/x y"]).unwrap();
        assert_eq!(url.path(), "/api/repository/id/feature%2Fx%20y");
    }

    #[test]
    fn url_refuses_empty_and_dot_segments() {
        let c = client("http://127.0.0.1:1234");
        for segment in ["", ".", ".."] {
            let err = c.url(["api", "repository", "id", segment]).unwrap_err();
            assert!(matches!(err, RepositoryError::Internal(_)), "segment {segment:?}");
        }
        assert_eq!(c.url(["api", "..."]).unwrap().path(), "/api/...");
    }

    #[test]
    fn url_rejects_cannot_be_a_base() {
        let c = client("mailto:docs@example.com");
        assert!(matches!(c.url(["api"]), Err(RepositoryError::Transport(_))));
    }
}

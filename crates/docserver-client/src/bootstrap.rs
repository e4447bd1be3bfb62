//! Launch-or-attach coordination.
//!
//! Before issuing repository calls a client needs a server answering on its
//! base URL. [`Bootstrap::attach`] waits briefly for an already running
//! server; [`Bootstrap::launch`] spawns one and waits for it to report healthy
//! on `/status`, racing that wait against the server task itself so an early
//! exit is reported instead of a timeout.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::task::{JoinError, JoinHandle};

use docserver_protocol::endpoints;
use docserver_types::Url;

use crate::error::{BootstrapError, BootstrapResult, BoxError};
use crate::remote::RemoteRepository;

/// Run `operation` with a deadline.
///
/// Whichever of the operation and the deadline finishes first wins; the other
/// is dropped before this returns, so a timed-out operation never keeps
/// running in the background.
pub async fn with_timeout<T, F>(after: Duration, operation: F) -> BootstrapResult<T>
where
    F: Future<Output = BootstrapResult<T>>,
{
    tokio::select! {
        biased;
        result = operation => result,
        _ = tokio::time::sleep(after) => Err(BootstrapError::Timeout { after }),
    }
}

/// Polls `GET /status` until the server answers 200.
#[derive(Clone, Debug)]
pub struct HealthCheck {
    client: reqwest::Client,
    status_url: Url,
    interval: Duration,
}

impl HealthCheck {
    pub fn new(base_url: &Url, interval: Duration) -> BootstrapResult<Self> {
        let mut status_url = base_url.clone();
        status_url
            .path_segments_mut()
            .map_err(|_| BootstrapError::InvalidUrl(base_url.to_string()))?
            .pop_if_empty()
            .extend(endpoints::STATUS.split('/').filter(|s| !s.is_empty()));
        Ok(Self {
            client: reqwest::Client::new(),
            status_url,
            interval,
        })
    }

    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// One status request. Connection failures and non-200 answers both count as
    /// "not healthy yet".
    pub async fn is_healthy(&self) -> bool {
        match self.client.get(self.status_url.clone()).send().await {
            Ok(response) => {
                tracing::trace!(status = response.status().as_u16(), url = %self.status_url, "health check");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                tracing::trace!(error = %e, url = %self.status_url, "health check failed");
                false
            }
        }
    }

    /// Poll until healthy. Never returns otherwise; bound it with
    /// [`with_timeout`].
    pub async fn wait_until_healthy(&self) {
        while !self.is_healthy().await {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Timing knobs for [`Bootstrap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub poll_interval: Duration,
    pub attach_timeout: Duration,
    pub launch_timeout: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            attach_timeout: Duration::from_secs(1),
            launch_timeout: Duration::from_secs(10),
        }
    }
}

/// Makes a documentation server reachable at a base URL.
#[derive(Clone, Debug)]
pub struct Bootstrap {
    base_url: Url,
    config: BootstrapConfig,
}

impl Bootstrap {
    pub fn new(base_url: Url) -> Self {
        Self::with_config(base_url, BootstrapConfig::default())
    }

    pub fn with_config(base_url: Url, config: BootstrapConfig) -> Self {
        Self { base_url, config }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    fn health_check(&self) -> BootstrapResult<HealthCheck> {
        HealthCheck::new(&self.base_url, self.config.poll_interval)
    }

    /// Wait for an already running server.
    pub async fn attach(&self) -> BootstrapResult<ServerHandle> {
        let health = self.health_check()?;
        with_timeout(self.config.attach_timeout, async {
            health.wait_until_healthy().await;
            Ok(())
        })
        .await?;
        tracing::info!(url = %self.base_url, "attached to documentation server");
        Ok(ServerHandle {
            base_url: self.base_url.clone(),
            task: None,
        })
    }

    /// Spawn `server` and wait until it answers on `/status`.
    ///
    /// Fails with [`BootstrapError::ServerExited`] when the server future
    /// completes first, and with [`BootstrapError::Timeout`] when neither
    /// happens before the launch deadline. On timeout the task is aborted.
    pub async fn launch<F, E>(&self, server: F) -> BootstrapResult<ServerHandle>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let health = self.health_check()?;
        let mut task: JoinHandle<Result<(), BoxError>> =
            tokio::spawn(async move { server.await.map_err(Into::into) });

        let race = async {
            tokio::select! {
                _ = health.wait_until_healthy() => Ok(()),
                exit = &mut task => Err(BootstrapError::ServerExited(describe_exit(exit))),
            }
        };

        match with_timeout(self.config.launch_timeout, race).await {
            Ok(()) => {
                tracing::info!(url = %self.base_url, "launched documentation server");
                Ok(ServerHandle {
                    base_url: self.base_url.clone(),
                    task: Some(task),
                })
            }
            Err(e) => {
                if e.is_timeout() {
                    task.abort();
                    let _ = task.await;
                }
                tracing::warn!(url = %self.base_url, error = %e, "failed to launch documentation server");
                Err(e)
            }
        }
    }
}

fn describe_exit(exit: Result<Result<(), BoxError>, JoinError>) -> String {
    match exit {
        Ok(Ok(())) => "server stopped".to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    }
}

/// A reachable server, and its task when this process launched it.
#[derive(Debug)]
pub struct ServerHandle {
    base_url: Url,
    task: Option<JoinHandle<Result<(), BoxError>>>,
}

impl ServerHandle {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_launched(&self) -> bool {
        self.task.is_some()
    }

    pub fn repository(&self) -> RemoteRepository {
        RemoteRepository::new(self.base_url.clone())
    }

    /// Wait for a launched server to stop. Returns at once when attached.
    pub async fn wait(self) -> Result<(), BoxError> {
        match self.task {
            Some(task) => task.await?,
            None => Ok(()),
        }
    }

    /// Stop a launched server. Attached servers are left alone.
    pub async fn shutdown(self) {
        if let Some(task) = self.task {
            task.abort();
            let _ = task.await;
        }
    }
}

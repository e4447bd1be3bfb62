use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use docserver_protocol::ServiceId;
use docserver_repository::DocumentationRepository;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::service::{DocumentationService, RepositoryService};

/// Documentation server host.
pub struct DocServer {
    config: ServerConfig,
    services: BTreeMap<ServiceId, Box<dyn DocumentationService>>,
}

impl DocServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            services: BTreeMap::new(),
        }
    }

    /// A server exposing `repository` as its repository service.
    pub fn with_repository<R>(config: ServerConfig, repository: R) -> Self
    where
        R: DocumentationRepository + 'static,
    {
        let mut server = Self::new(config);
        server.register_service(RepositoryService::new(Arc::new(repository)));
        server
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Register a service. A service with the same id replaces the old one.
    pub fn register_service<S: DocumentationService + 'static>(&mut self, service: S) {
        let id = service.id();
        tracing::debug!(service = %id, "registered service");
        self.services.insert(id, Box::new(service));
    }

    pub fn service_ids(&self) -> impl Iterator<Item = &ServiceId> {
        self.services.keys()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.services.values().map(|s| s.as_ref()))
    }

    /// Serve until the process is killed.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Bind the configured address and serve until `signal` completes.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve_on(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` completes.
    pub async fn serve_on<F>(self, listener: TcpListener, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let addr = listener.local_addr()?;
        let services: Vec<String> = self.services.keys().map(ToString::to_string).collect();
        tracing::info!(%addr, ?services, "documentation server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!(%addr, "documentation server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docserver_repository::InMemoryRepository;

    #[test]
    fn server_construction() {
        let server = DocServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr(), "127.0.0.1:1234");
        assert_eq!(server.service_ids().count(), 0);
    }

    #[test]
    fn with_repository_registers_repository_service() {
        let server = DocServer::with_repository(ServerConfig::default(), InMemoryRepository::new());
        let ids: Vec<_> = server.service_ids().cloned().collect();
        assert_eq!(ids, vec![ServiceId::repository()]);
        let _router = server.router();
    }

    #[test]
    fn registering_twice_replaces() {
        let mut server = DocServer::new(ServerConfig::default());
        server.register_service(RepositoryService::new(Arc::new(InMemoryRepository::new())));
        server.register_service(RepositoryService::new(Arc::new(InMemoryRepository::new())));
        assert_eq!(server.service_ids().count(), 1);
    }

    #[tokio::test]
    async fn serve_on_stops_on_signal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = DocServer::with_repository(ServerConfig::default(), InMemoryRepository::new());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(server.serve_on(listener, async move {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }
}

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use docserver_protocol::{endpoints, ServerStatus};

use crate::handler;
use crate::service::DocumentationService;

/// Build the axum router: every service under `/api/<id>` plus `/status`.
pub fn build_router<'a>(services: impl IntoIterator<Item = &'a dyn DocumentationService>) -> Router {
    let mut router = Router::new();
    let mut status = ServerStatus::default();

    for service in services {
        let id = service.id();
        router = router.nest(&id.mount_path(), service.router());
        status.services.insert(id);
    }

    router
        .route(
            endpoints::STATUS,
            get(handler::status_handler).with_state(Arc::new(status)),
        )
        .layer(TraceLayer::new_for_http())
}

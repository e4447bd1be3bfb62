use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use docserver_protocol::ServerStatus;

/// Status handler. Answers 200 with the registered service names whenever
/// the process is serving requests.
pub async fn status_handler(State(status): State<Arc<ServerStatus>>) -> Json<ServerStatus> {
    Json(status.as_ref().clone())
}

//! Bundle and revision routes.
//!
//! Each handler is a thin translation between HTTP and one
//! [`DocumentationRepository`](docserver_repository::DocumentationRepository)
//! call. Atomicity comes from the repository; the handlers take no locks.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use docserver_protocol::{
    CreateBundleRequest, CreateRevisionRequest, SearchParams, UpdateBundleRequest,
};
use docserver_repository::SharedRepository;
use docserver_types::{Bundle, BundleId, BundleQuery, Revision};

use crate::error::{ApiError, ApiResult};

/// Routes relative to the repository service mount point.
pub fn routes(repository: SharedRepository) -> Router {
    Router::new()
        .route("/", get(list_bundles).post(create_bundle))
        .route(
            "/:id",
            get(bundle_detail)
                .patch(update_bundle)
                .delete(delete_bundle)
                .post(create_revision),
        )
        .route(
            "/:id/:tag",
            get(revision_detail)
                .put(update_revision)
                .delete(delete_revision),
        )
        .with_state(repository)
}

// ---- Bundles ----

async fn list_bundles(
    State(repository): State<SharedRepository>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Bundle>>> {
    let Query(params) = params?;
    let query = BundleQuery::from(params);
    Ok(Json(repository.search(&query).await?))
}

async fn create_bundle(
    State(repository): State<SharedRepository>,
    payload: Result<Json<CreateBundleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Bundle>)> {
    let Json(request) = payload?;
    let bundle = repository
        .add_bundle(&request.display_name, &request.bundle_identifier)
        .await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn bundle_detail(
    State(repository): State<SharedRepository>,
    path: Result<Path<BundleId>, PathRejection>,
) -> ApiResult<Json<Bundle>> {
    let Path(id) = path?;
    repository
        .bundle(id)
        .await?
        .map(Json)
        .ok_or(ApiError::BundleNotFound(id))
}

async fn update_bundle(
    State(repository): State<SharedRepository>,
    path: Result<Path<BundleId>, PathRejection>,
    payload: Result<Json<UpdateBundleRequest>, JsonRejection>,
) -> ApiResult<Json<Bundle>> {
    let Path(id) = path?;
    // Reserved route: an absent or malformed body still answers 503.
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    Ok(Json(repository.update_bundle(id, request.display_name).await?))
}

async fn delete_bundle(
    State(repository): State<SharedRepository>,
    path: Result<Path<BundleId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    repository.remove_bundle(id).await?;
    Ok(StatusCode::ACCEPTED)
}

// ---- Revisions ----

async fn create_revision(
    State(repository): State<SharedRepository>,
    path: Result<Path<BundleId>, PathRejection>,
    payload: Result<Json<CreateRevisionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Revision>)> {
    let Path(bundle_id) = path?;
    let Json(request) = payload?;
    let revision = repository
        .add_revision(&request.tag, request.source, bundle_id)
        .await?;
    Ok((StatusCode::CREATED, Json(revision)))
}

async fn revision_detail(
    State(repository): State<SharedRepository>,
    path: Result<Path<(BundleId, String)>, PathRejection>,
) -> ApiResult<Json<Revision>> {
    let Path((bundle_id, tag)) = path?;
    match repository.revision(&tag, bundle_id).await? {
        Some(revision) => Ok(Json(revision)),
        None => Err(ApiError::RevisionNotFound { bundle_id, tag }),
    }
}

async fn update_revision() -> ApiResult<Json<Revision>> {
    Err(ApiError::NotImplemented)
}

async fn delete_revision(
    State(repository): State<SharedRepository>,
    path: Result<Path<(BundleId, String)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((bundle_id, tag)) = path?;
    repository.remove_revision(&tag, bundle_id).await?;
    Ok(StatusCode::ACCEPTED)
}

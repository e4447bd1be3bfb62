use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use docserver_protocol::ErrorResponse;
use docserver_repository::RepositoryError;
use docserver_types::{BundleId, DetailValue};

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors returned by request handlers, rendered as [`ErrorResponse`] bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no bundle with id='{0}'")]
    BundleNotFound(BundleId),

    #[error("no revision with id='{bundle_id}' tag='{tag}'")]
    RevisionNotFound { bundle_id: BundleId, tag: String },

    #[error("not implemented")]
    NotImplemented,

    /// The request could not be decoded (path, query, or body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BundleNotFound(_) | Self::RevisionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotImplemented => StatusCode::SERVICE_UNAVAILABLE,
            Self::Rejected { status, .. } => *status,
            Self::Repository(e) => match e {
                RepositoryError::BundleNotFound { .. } => StatusCode::NOT_FOUND,
                RepositoryError::NotImplemented { .. } => StatusCode::SERVICE_UNAVAILABLE,
                RepositoryError::Invalid(_) => StatusCode::BAD_REQUEST,
                RepositoryError::Status { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                RepositoryError::Transport(_) | RepositoryError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
                RepositoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Detail attached to the error body. Unimplemented routes carry none.
    pub fn detail(&self) -> Option<DetailValue> {
        match self {
            Self::NotImplemented => None,
            Self::Repository(RepositoryError::NotImplemented { .. }) => None,
            Self::Repository(RepositoryError::Status { detail, .. }) => detail.clone(),
            Self::Repository(RepositoryError::BundleNotFound { id }) => {
                Some(DetailValue::from(format!("no bundle with id='{id}'")))
            }
            other => Some(DetailValue::from(other.to_string())),
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.status().as_u16(), self.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_detail() {
        let id = BundleId::new();
        let body = ApiError::BundleNotFound(id).to_body();
        assert_eq!(body.status, 404);
        assert_eq!(body.detail, Some(DetailValue::from(format!("no bundle with id='{id}'"))));

        let body = ApiError::from(RepositoryError::BundleNotFound { id }).to_body();
        assert_eq!(body.status, 404);
    }

    #[test]
    fn not_implemented_has_no_detail() {
        assert_eq!(ApiError::NotImplemented.to_body(), ErrorResponse::without_detail(503));
        let e = ApiError::from(RepositoryError::NotImplemented { operation: "update bundle" });
        assert_eq!(e.to_body(), ErrorResponse::without_detail(503));
    }

    #[test]
    fn upstream_status_passes_through() {
        let e = ApiError::from(RepositoryError::Status {
            status: 409,
            detail: Some(DetailValue::Integer(7)),
        });
        assert_eq!(e.to_body(), ErrorResponse::new(409, Some(DetailValue::Integer(7))));
    }

    #[test]
    fn invalid_arguments_are_bad_requests() {
        let invalid = docserver_types::validate_tag("..").unwrap_err();
        let e = ApiError::from(RepositoryError::from(invalid));
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            e.detail(),
            Some(DetailValue::from("invalid tag '..': dot segments cannot be addressed"))
        );
    }

    #[test]
    fn transport_and_internal_failures() {
        let e = ApiError::from(RepositoryError::Transport("refused".into()));
        assert_eq!(e.status(), StatusCode::BAD_GATEWAY);
        let e = ApiError::from(RepositoryError::Internal("lock poisoned".into()));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            e.detail(),
            Some(DetailValue::from("internal error: lock poisoned"))
        );
    }
}

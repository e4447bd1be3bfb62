//! Error types for repository operations.

use docserver_types::{BundleId, DetailValue, TypeError};
use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// Lookups of unknown bundles or revisions are not errors: they return
/// `Ok(None)`. Removals of unknown targets succeed silently.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// An operation needed an existing bundle and none was found.
    #[error("bundle not found: {id}")]
    BundleNotFound { id: BundleId },

    /// The operation is reserved but deliberately unimplemented.
    #[error("not implemented: {operation}")]
    NotImplemented { operation: &'static str },

    /// An argument cannot be stored or addressed, such as an empty tag.
    #[error(transparent)]
    Invalid(#[from] TypeError),

    /// A remote server answered with a non-success status.
    #[error("server responded with status {status}: {}", describe_detail(.detail))]
    Status {
        status: u16,
        detail: Option<DetailValue>,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Returns `true` if the error means the target does not exist, whether
    /// it was raised locally or reported by a remote server.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BundleNotFound { .. } | Self::Status { status: 404, .. }
        )
    }
}

fn describe_detail(detail: &Option<DetailValue>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => "no detail".to_string(),
    }
}

/// Convenience type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_local_and_remote() {
        assert!(RepositoryError::BundleNotFound { id: BundleId::new() }.is_not_found());
        assert!(RepositoryError::Status { status: 404, detail: None }.is_not_found());
        assert!(!RepositoryError::Status { status: 503, detail: None }.is_not_found());
        assert!(!RepositoryError::Transport("refused".into()).is_not_found());
        assert!(!RepositoryError::from(docserver_types::validate_tag("").unwrap_err()).is_not_found());
    }

    #[test]
    fn status_display_includes_detail() {
        let e = RepositoryError::Status {
            status: 404,
            detail: Some(DetailValue::from("no bundle")),
        };
        assert_eq!(e.to_string(), "server responded with status 404: no bundle");
        let e = RepositoryError::Status { status: 503, detail: None };
        assert_eq!(e.to_string(), "server responded with status 503: no detail");
    }
}

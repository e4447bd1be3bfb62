use std::time::Duration;

use thiserror::Error;

/// Error type accepted from a launched server future.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while waiting for a server to become reachable.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The deadline passed before `/status` answered 200.
    #[error("timed out after {after:?} waiting for the server to become healthy")]
    Timeout { after: Duration },

    /// A launched server stopped before it became healthy.
    #[error("server exited before becoming healthy: {0}")]
    ServerExited(String),

    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

impl BootstrapError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP endpoint paths for the documentation server.
pub mod endpoints {
    /// Prefix under which every documentation service is mounted.
    pub const API: &str = "/api";
    pub const REPOSITORY: &str = "/api/repository";
    /// Liveness endpoint polled during bootstrap.
    pub const STATUS: &str = "/status";
}

/// Name of a documentation service mounted under `/api/<id>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub const REPOSITORY: &'static str = "repository";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn repository() -> Self {
        Self::new(Self::REPOSITORY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mount path of the service, e.g. `/api/repository`.
    pub fn mount_path(&self) -> String {
        format!("{}/{}", endpoints::API, self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET /status`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub services: BTreeSet<ServiceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::STATUS, "/status");
        assert_eq!(endpoints::REPOSITORY, "/api/repository");
        assert_eq!(ServiceId::repository().mount_path(), endpoints::REPOSITORY);
    }

    #[test]
    fn status_lists_service_names() {
        let status = ServerStatus {
            services: [ServiceId::repository()].into_iter().collect(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"services":["repository"]}"#);
        let back: ServerStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}

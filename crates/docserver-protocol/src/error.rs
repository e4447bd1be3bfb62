use serde::{Deserialize, Serialize};
use thiserror::Error;

use docserver_types::DetailValue;

/// Body sent with every non-2xx response.
///
/// Serializes as `{"status": <int>, "detail": <json|null>}`. The detail has
/// no fixed shape; each endpoint attaches whatever diagnostic it has.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Error)]
#[error("Error({status}): {}", describe(.detail))]
pub struct ErrorResponse {
    pub status: u16,
    #[serde(default)]
    pub detail: Option<DetailValue>,
}

fn describe(detail: &Option<DetailValue>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => "No Detail".to_string(),
    }
}

impl ErrorResponse {
    pub fn new(status: u16, detail: Option<DetailValue>) -> Self {
        Self { status, detail }
    }

    pub fn with_detail(status: u16, detail: impl Into<DetailValue>) -> Self {
        Self::new(status, Some(detail.into()))
    }

    pub fn without_detail(status: u16) -> Self {
        Self::new(status, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_null_detail() {
        let json = serde_json::to_string(&ErrorResponse::without_detail(503)).unwrap();
        assert_eq!(json, r#"{"status":503,"detail":null}"#);
    }

    #[test]
    fn decodes_arbitrary_detail_shapes() {
        let e: ErrorResponse =
            serde_json::from_str(r#"{"status":400,"detail":{"field":"tag","line":3}}"#).unwrap();
        assert_eq!(e.status, 400);
        let detail = e.detail.unwrap();
        assert_eq!(detail.get("line"), Some(&DetailValue::Integer(3)));
    }

    #[test]
    fn missing_or_null_detail_is_none() {
        let e: ErrorResponse = serde_json::from_str(r#"{"status":404}"#).unwrap();
        assert_eq!(e.detail, None);
        let e: ErrorResponse = serde_json::from_str(r#"{"status":404,"detail":null}"#).unwrap();
        assert_eq!(e.detail, None);
    }

    #[test]
    fn display_matches_error_description() {
        assert_eq!(
            ErrorResponse::with_detail(404, "no bundle").to_string(),
            "Error(404): no bundle"
        );
        assert_eq!(ErrorResponse::without_detail(503).to_string(), "Error(503): No Detail");
    }
}

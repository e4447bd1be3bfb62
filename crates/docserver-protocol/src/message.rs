use serde::{Deserialize, Serialize};

use docserver_types::{BundleQuery, Url};

/// Body of `POST /api/repository`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBundleRequest {
    pub display_name: String,
    pub bundle_identifier: String,
}

/// Body of `PATCH /api/repository/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBundleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Body of `POST /api/repository/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRevisionRequest {
    pub tag: String,
    pub source: Url,
}

/// Query string of `GET /api/repository`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl From<&BundleQuery> for SearchParams {
    fn from(query: &BundleQuery) -> Self {
        Self {
            term: query.effective_term().map(str::to_string),
        }
    }
}

impl From<SearchParams> for BundleQuery {
    fn from(params: SearchParams) -> Self {
        BundleQuery::new(params.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_bundle_uses_camel_case() {
        let req: CreateBundleRequest = serde_json::from_str(
            r#"{"displayName":"DocumentationKit","bundleIdentifier":"com.example.DocumentationKit"}"#,
        )
        .unwrap();
        assert_eq!(req.display_name, "DocumentationKit");
        assert_eq!(req.bundle_identifier, "com.example.DocumentationKit");
    }

    #[test]
    fn update_bundle_fields_are_optional() {
        let req: UpdateBundleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.display_name, None);
    }

    #[test]
    fn create_revision_requires_a_url() {
        let ok: CreateRevisionRequest =
            serde_json::from_str(r#"{"tag":"1.0.0","source":"file:///docs/Kit.doccarchive"}"#)
                .unwrap();
        assert_eq!(ok.source.scheme(), "file");
        assert!(serde_json::from_str::<CreateRevisionRequest>(r#"{"tag":"1.0.0","source":"not a url"}"#).is_err());
    }

    #[test]
    fn search_params_drop_empty_terms() {
        assert_eq!(SearchParams::from(&BundleQuery::term("")).term, None);
        assert_eq!(SearchParams::from(&BundleQuery::term("kit")).term.as_deref(), Some("kit"));
        let q: BundleQuery = SearchParams { term: Some("docu".into()) }.into();
        assert_eq!(q, BundleQuery::term("docu"));
    }
}

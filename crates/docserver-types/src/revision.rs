use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TypeError;
use crate::identity::{BundleId, RevisionId};

/// A tagged pointer at a documentation source.
///
/// `tag` is unique within the owning bundle only. The `source` is opaque to
/// the repository: it may be a `file://` path or a remote URL and is never
/// dereferenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: RevisionId,
    pub tag: String,
    pub source: Url,
    pub bundle_id: BundleId,
}

impl Revision {
    /// Create a revision record with a freshly assigned id.
    pub fn new(tag: impl Into<String>, source: Url, bundle_id: BundleId) -> Self {
        Self {
            id: RevisionId::new(),
            tag: tag.into(),
            source,
            bundle_id,
        }
    }
}

/// Check that `tag` can name a revision.
///
/// A tag travels as one URL path segment, so it must be non-empty and must not
/// be a dot segment, which URL normalization would remove.
pub fn validate_tag(tag: &str) -> Result<(), TypeError> {
    let reason = match tag {
        "" => "tag is empty",
        "." | ".." => "dot segments cannot be addressed",
        _ => return Ok(()),
    };
    Err(TypeError::InvalidTag {
        tag: tag.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_must_be_addressable() {
        for tag in ["", ".", ".."] {
            assert!(
                matches!(validate_tag(tag), Err(TypeError::InvalidTag { tag: ref t, .. }) if t == tag),
                "tag {tag:?}"
            );
        }
        for tag in ["1.0.0", "latest", "...", ".hidden", "feature/x y", "%2E"] {
            assert_eq!(validate_tag(tag), Ok(()), "tag {tag:?}");
        }
    }

    #[test]
    fn new_revision_assigns_distinct_ids() {
        let bundle = BundleId::new();
        let source = Url::parse("file:///docs/Kit.doccarchive").unwrap();
        let a = Revision::new("1.0.0", source.clone(), bundle);
        let b = Revision::new("1.0.0", source, bundle);
        assert_ne!(a.id, b.id);
        assert_eq!(a.bundle_id, b.bundle_id);
    }

    #[test]
    fn json_uses_bundle_id_key() {
        let r = Revision::new(
            "latest",
            Url::parse("https://docs.example.com/kit/").unwrap(),
            BundleId::new(),
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["tag"], "latest");
        assert_eq!(v["source"], "https://docs.example.com/kit/");
        assert_eq!(v["bundleId"], serde_json::Value::String(r.bundle_id.to_string()));
        let back: Revision = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }
}

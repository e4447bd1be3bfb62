use serde::{Deserialize, Serialize};

use crate::bundle::BundleMetadata;

/// Search filter over bundles.
///
/// This is a plain substring filter, not a ranking engine: a bundle matches
/// when the term occurs, ignoring case, in its display name or its bundle
/// identifier. An absent or empty term matches every bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleQuery {
    pub term: Option<String>,
}

impl BundleQuery {
    pub fn new(term: Option<String>) -> Self {
        Self { term }
    }

    /// A query matching every bundle.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
        }
    }

    /// The effective search term, `None` when the query matches everything.
    pub fn effective_term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.is_empty())
    }

    pub fn matches(&self, metadata: &BundleMetadata) -> bool {
        let Some(term) = self.effective_term() else {
            return true;
        };
        let needle = term.to_lowercase();
        metadata.display_name.to_lowercase().contains(&needle)
            || metadata.bundle_identifier.to_lowercase().contains(&needle)
    }
}

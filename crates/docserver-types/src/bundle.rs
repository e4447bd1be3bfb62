use serde::{Deserialize, Serialize};

use crate::identity::BundleId;

/// Human-facing description of a bundle.
///
/// Neither field is required to be unique: two bundles may share a display
/// name or a bundle identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    /// Human-readable name, e.g. `DocumentationKit`.
    pub display_name: String,
    /// Reverse-domain identifier of the documented product,
    /// e.g. `com.example.DocumentationKit`.
    pub bundle_identifier: String,
}

impl BundleMetadata {
    pub fn new(display_name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            bundle_identifier: bundle_identifier.into(),
        }
    }
}

/// A named documentation collection.
///
/// `revisions` lists the tags currently attached to the bundle. The list
/// carries no ordering guarantee across implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: BundleId,
    pub metadata: BundleMetadata,
    #[serde(default)]
    pub revisions: Vec<String>,
}

impl Bundle {
    /// A freshly created bundle with no revisions.
    pub fn new(id: BundleId, metadata: BundleMetadata) -> Self {
        Self {
            id,
            metadata,
            revisions: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    pub fn bundle_identifier(&self) -> &str {
        &self.metadata.bundle_identifier
    }

    /// Returns `true` if a revision with `tag` is attached.
    pub fn has_revision(&self, tag: &str) -> bool {
        self.revisions.iter().any(|t| t == tag)
    }
}

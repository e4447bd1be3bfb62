//! Finding DocC archives on disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use walkdir::WalkDir;

const ARCHIVE_EXTENSION: &str = "doccarchive";
const METADATA_FILE: &str = "metadata.json";

/// The `metadata.json` written at the root of a `.doccarchive`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveMetadata {
    bundle_display_name: Option<String>,
    bundle_identifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredBundle {
    pub path: PathBuf,
    pub display_name: String,
    pub bundle_identifier: String,
}

pub fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}

/// Read the bundle metadata of the archive at `path`.
///
/// Without a `metadata.json` (or without names in it) the display name is the
/// directory stem, and the identifier falls back to the display name.
pub fn discover_bundle(path: &Path) -> anyhow::Result<DiscoveredBundle> {
    if !path.is_dir() {
        bail!("{} is not a documentation archive directory", path.display());
    }

    let metadata_path = path.join(METADATA_FILE);
    let metadata = if metadata_path.is_file() {
        let raw = std::fs::read_to_string(&metadata_path)
            .with_context(|| format!("failed to read {}", metadata_path.display()))?;
        serde_json::from_str::<ArchiveMetadata>(&raw)
            .with_context(|| format!("failed to parse {}", metadata_path.display()))?
    } else {
        ArchiveMetadata::default()
    };

    let display_name = match metadata.bundle_display_name {
        Some(name) => name,
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .with_context(|| format!("cannot name bundle at {}", path.display()))?,
    };
    let bundle_identifier = metadata
        .bundle_identifier
        .unwrap_or_else(|| display_name.clone());

    Ok(DiscoveredBundle {
        path: path.to_path_buf(),
        display_name,
        bundle_identifier,
    })
}

/// Every archive under `root` (including `root` itself), sorted by path.
/// Archives nested inside other archives are not reported.
pub fn discover_bundles(root: &Path) -> anyhow::Result<Vec<DiscoveredBundle>> {
    let mut found = Vec::new();
    let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();
    while let Some(entry) = entries.next() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_dir() && is_archive(entry.path()) {
            found.push(discover_bundle(entry.path())?);
            entries.skip_current_dir();
        }
    }
    found.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(root = %root.display(), count = found.len(), "discovered archives");
    Ok(found)
}

//! Workspace manifest resolution
//!
//! Picks the entry manifest for a workspace root, expands its includes,
//! appends any local override documents, and folds everything into one
//! [`ResolvedManifest`]. A workspace with no entry manifest at all is
//! uninitialized, which is a `None` result rather than an error.

use crate::config::{ConfigProvider, GitConfigProvider};
use crate::manifest::include::resolve_includes;
use crate::manifest::merge::{merge_all, ResolvedManifest};
use crate::{FlotillaError, Result};
use std::path::{Path, PathBuf};

/// Preferred entry manifest at the workspace root
pub const MANIFEST_XML_FILE: &str = "manifest.xml";

/// Directory holding the manifest checkout and its named manifest files
pub const MANIFESTS_DIR: &str = "manifests";

/// Deprecated single local override file
pub const LOCAL_MANIFEST_FILE: &str = "local_manifest.xml";

/// Directory of local override manifests
pub const LOCAL_MANIFEST_DIR: &str = "local_manifests";

/// Config key naming the manifest file to use under the manifests directory
pub const MANIFEST_NAME_KEY: &str = "manifest.name";

/// Manifest file used when the config store names none
pub const DEFAULT_MANIFEST_NAME: &str = "default.xml";

/// Resolve the workspace rooted at `root` into one merged manifest
///
/// Entry-file selection: `<root>/manifest.xml` if present, otherwise
/// `<root>/manifests/<name>` where `<name>` comes from the config store's
/// `manifest.name` key, defaulting to `default.xml`. If neither exists the
/// workspace is uninitialized and `Ok(None)` is returned.
///
/// Local overrides — the deprecated `<root>/local_manifest.xml` and every
/// `*.xml` under `<root>/local_manifests/` (sorted) — are resolved
/// independently and folded in after the primary document sequence.
pub fn resolve_workspace(
    root: &Path,
    config: &dyn ConfigProvider,
) -> Result<Option<ResolvedManifest>> {
    let mut entry = root.join(MANIFEST_XML_FILE);
    if !entry.exists() {
        let name = config
            .get(MANIFEST_NAME_KEY)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string());
        entry = root.join(MANIFESTS_DIR).join(name);
    }

    // Uninitialized workspace
    if !entry.exists() {
        return Ok(None);
    }

    let mut documents = resolve_includes(&entry, 1)?;
    for file in local_override_files(root)? {
        documents.extend(resolve_includes(&file, 1)?);
    }

    merge_all(documents).map(Some)
}

/// Resolve with the config store read from the manifests checkout itself
pub fn resolve_workspace_default(root: &Path) -> Result<Option<ResolvedManifest>> {
    let config = GitConfigProvider::new(root.join(MANIFESTS_DIR));
    resolve_workspace(root, &config)
}

/// Collect local override files: the deprecated single file first, then
/// every `*.xml` anywhere under the local manifests directory, sorted
fn local_override_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let deprecated = root.join(LOCAL_MANIFEST_FILE);
    let dir = root.join(LOCAL_MANIFEST_DIR);
    if deprecated.exists() {
        tracing::warn!(
            "{} is deprecated; put local manifests in `{}` instead",
            deprecated.display(),
            dir.display()
        );
        files.push(deprecated);
    }

    if dir.is_dir() {
        let pattern = dir.join("**").join("*.xml");
        let pattern = pattern.to_string_lossy().into_owned();
        let mut found = Vec::new();
        for entry in glob::glob(&pattern).map_err(|e| {
            FlotillaError::Config(format!("bad local manifest pattern '{}': {}", pattern, e))
        })? {
            let path = entry.map_err(|e| FlotillaError::Io(e.into_error()))?;
            if path.is_file() {
                found.push(path);
            }
        }
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

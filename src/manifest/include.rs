//! Recursive include expansion
//!
//! A manifest may splice in other manifest files with `<include>` elements.
//! Expansion is a pre-order traversal: a document is emitted before anything
//! it includes, and sibling includes expand in declaration order. Depth is
//! bounded so a circular include graph fails with a diagnosable error
//! instead of recursing without end.

use crate::manifest::model::Manifest;
use crate::{FlotillaError, Result};
use std::path::Path;

/// Maximum include nesting; root documents are resolved at depth 1
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Parse `file` and expand its includes into an ordered document sequence
///
/// Include targets are resolved relative to the including file's directory.
/// Any read or parse failure on any file aborts the whole expansion with
/// that file's error.
pub fn resolve_includes(file: &Path, depth: usize) -> Result<Vec<Manifest>> {
    let manifest = Manifest::from_file(file)?;
    let includes = manifest.includes.clone();

    let mut documents = vec![manifest];
    for include in &includes {
        let dir = file.parent().unwrap_or_else(|| Path::new(""));
        let target = dir.join(&include.name);

        if depth > MAX_INCLUDE_DEPTH {
            return Err(FlotillaError::RecursionLimit {
                including: file.to_path_buf(),
                included: target,
            });
        }

        documents.extend(resolve_includes(&target, depth + 1)?);
    }

    Ok(documents)
}

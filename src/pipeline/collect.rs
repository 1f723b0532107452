//! Source collection: resolve configured roots to concrete file lists.
//!
//! Collection walks every source root recursively, in root order, keeping
//! files whose extension matches the requested kind. Traversal within a
//! root is sorted by file name so the downstream collision order is
//! reproducible across filesystems and reruns. Duplicates are preserved;
//! the merge stage owns the collision policy.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Collect all files with the given extension (without dot) under the
/// source roots, recursively, concatenated in root order.
///
/// Fails with a configuration error if `roots` is empty. A root that does
/// not exist contributes no files; missing sources surface as an empty
/// output rather than an I/O failure.
pub fn collect_sources(roots: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    if roots.is_empty() {
        return Err(Error::config(
            "sources must name at least one directory to collect files from",
        ));
    }

    let mut files = Vec::new();
    for root in roots {
        if !root.exists() {
            log::warn!("source root '{}' does not exist, skipping", root.display());
            continue;
        }
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                files.push(path.to_path_buf());
            }
        }
    }
    log::debug!("collected {} .{} file(s)", files.len(), extension);
    Ok(files)
}

/// Remove every file whose path matches any of the blacklist patterns.
///
/// Patterns are regular expressions tested against the full path. An empty
/// pattern list is a strict no-op: the input is returned unchanged.
pub fn filter_blacklist(files: Vec<PathBuf>, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if patterns.is_empty() {
        return Ok(files);
    }

    let regexes = patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let before = files.len();
    let kept: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| {
            let text = path.to_string_lossy();
            !regexes.iter().any(|re| re.is_match(&text))
        })
        .collect();
    if kept.len() != before {
        log::debug!("blacklist removed {} file(s)", before - kept.len());
    }
    Ok(kept)
}

/// The logical output name for a source file: its stem, extension dropped.
pub fn logical_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

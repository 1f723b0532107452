//! SCSS compilation via the `grass` compiler.
//!
//! Each SCSS file is an independent translation unit compiled on the rayon
//! pool, so fan-out is bounded by the core count. Results come back in
//! input order; the first compile failure aborts the stage and any sibling
//! results are dropped. Partials (file names starting with `_`) are never
//! compiled standalone; they are reachable through `@use`/`@import` via the
//! configured include paths and the importing file's own directory.

use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::pipeline::StagedSheet;

/// True for SCSS partials, which are imported rather than compiled.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Compile every non-partial SCSS file to a staged sheet.
///
/// `compressed` selects the compiler's output style; the minify stage still
/// runs over the staged result when enabled. A failure for any file fails
/// the whole stage with the originating path and the compiler's message.
pub fn compile_all(
    files: &[PathBuf],
    include_paths: &[PathBuf],
    compressed: bool,
) -> Result<Vec<StagedSheet>> {
    let units: Vec<&PathBuf> = files.iter().filter(|f| !is_partial(f)).collect();
    if units.len() != files.len() {
        log::debug!("skipping {} partial(s)", files.len() - units.len());
    }

    let style = if compressed {
        OutputStyle::Compressed
    } else {
        OutputStyle::Expanded
    };

    units
        .par_iter()
        .map(|path| compile_one(path, include_paths, style))
        .collect()
}

fn compile_one(
    path: &Path,
    include_paths: &[PathBuf],
    style: OutputStyle,
) -> Result<StagedSheet> {
    let name = super::collect::logical_name(path).ok_or_else(|| Error::Workspace {
        message: format!("'{}' has no usable file name", path.display()),
    })?;

    let mut options = Options::default().style(style);
    for include in include_paths {
        options = options.load_path(include);
    }
    // The file's own directory participates in import resolution, matching
    // the sass CLI.
    if let Some(parent) = path.parent() {
        options = options.load_path(parent);
    }

    let css = grass::from_path(path, &options).map_err(|e| Error::Compile {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    log::debug!("compiled '{}'", path.display());
    Ok(StagedSheet::new(name, css, path.to_path_buf()))
}

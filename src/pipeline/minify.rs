//! Minify stage: rewrite every staged sheet with its minified equivalent.
//!
//! Minification uses `lightningcss` (parse, minify, print) and runs on the
//! rayon pool, one task per staged file. A failure for any file fails the
//! run: silently shipping unminified production output would violate the
//! `minify` contract. Rewrites are write-to-temp-then-rename.

use std::fs;
use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::pipeline::workspace;

/// Minify every `.css` file in the staging directory in place.
pub fn minify_dir(staging: &Path) -> Result<()> {
    workspace::staged_css_files(staging)?
        .par_iter()
        .map(|path| {
            let css = fs::read_to_string(path)?;
            let minified = minify_text(&css).map_err(|message| Error::Compile {
                file: path.display().to_string(),
                message,
            })?;
            workspace::write_atomic(path, &minified)?;
            log::debug!("minified '{}'", path.display());
            Ok(())
        })
        .collect()
}

/// Minify one stylesheet's text.
fn minify_text(css: &str) -> std::result::Result<String, String> {
    let mut sheet =
        StyleSheet::parse(css, ParserOptions::default()).map_err(|e| e.to_string())?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| e.to_string())?;
    let output = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(output.code)
}

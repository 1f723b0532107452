//! Normalization stage: the two fixed baseline sheets.
//!
//! Appends the vendored normalize sheet and the preflight sheet, in that
//! order, to the reserved `normalize.css` staged file. The stage always
//! runs, exactly once per run, before any purge or minify step. The sheets
//! are embedded at compile time; their content is not user-configurable.
//!
//! If a source file already staged the reserved logical name, the baseline
//! sheets are appended to it; reserving the name entirely is left to the
//! ordinary collision policy.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Logical name of the staged file the baseline sheets land in.
pub const RESERVED_NAME: &str = "normalize";

static NORMALIZE_CSS: &str = include_str!("../../assets/normalize.css");
static PREFLIGHT_CSS: &str = include_str!("../../assets/preflight.css");

/// Append the normalize and preflight sheets to the reserved staged file.
pub fn apply(staging: &Path) -> Result<()> {
    let target = staging.join(format!("{}.css", RESERVED_NAME));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&target)?;
    file.write_all(NORMALIZE_CSS.as_bytes())?;
    file.write_all(b"\n")?;
    file.write_all(PREFLIGHT_CSS.as_bytes())?;
    log::debug!("wrote baseline sheets to '{}'", target.display());
    Ok(())
}

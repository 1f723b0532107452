//! The collision-resolution core: staging sheets under logical names.
//!
//! Every sheet entering the staging directory passes through one [`Merger`]
//! value, whether it came from a hand-written CSS file or from the SCSS
//! compiler, so both kinds share a single collision domain. The first
//! writer for a logical name creates `<name>.css` verbatim. A later writer
//! for the same name either appends its content separated by a newline
//! (when `autoresolve` is enabled) or fails the run naming both
//! contributing files. A collision is never resolved by silently dropping
//! one side.
//!
//! Processing order is source-root order, then sorted traversal order
//! within a root, so concatenation output is stable across reruns.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pipeline::StagedSheet;

/// Stages sheets into a directory, enforcing the collision policy.
#[derive(Debug)]
pub struct Merger<'a> {
    staging: &'a Path,
    auto_resolve: bool,
    /// Logical name -> first contributing source, for collision reporting.
    seen: HashMap<String, PathBuf>,
}

impl<'a> Merger<'a> {
    pub fn new(staging: &'a Path, auto_resolve: bool) -> Self {
        Self {
            staging,
            auto_resolve,
            seen: HashMap::new(),
        }
    }

    /// Stage one sheet under its logical name.
    pub fn stage(&mut self, sheet: &StagedSheet) -> Result<()> {
        let target = self.staging.join(format!("{}.css", sheet.name));

        match self.seen.get(&sheet.name) {
            None => {
                std::fs::write(&target, &sheet.css)?;
                self.seen
                    .insert(sheet.name.clone(), sheet.source.clone());
                Ok(())
            }
            Some(first) if self.auto_resolve => {
                log::info!(
                    "merging '{}' into '{}.css' (first written from '{}')",
                    sheet.source.display(),
                    sheet.name,
                    first.display()
                );
                let mut file = OpenOptions::new().append(true).open(&target)?;
                file.write_all(b"\n")?;
                file.write_all(sheet.css.as_bytes())?;
                Ok(())
            }
            Some(first) => Err(Error::NameCollision {
                name: sheet.name.clone(),
                first: first.display().to_string(),
                second: sheet.source.display().to_string(),
            }),
        }
    }

    /// Read a hand-written CSS file and stage it under its stem.
    pub fn stage_file(&mut self, source: &Path) -> Result<()> {
        let name = super::collect::logical_name(source).ok_or_else(|| Error::Workspace {
            message: format!("'{}' has no usable file name", source.display()),
        })?;
        let css = std::fs::read_to_string(source)?;
        self.stage(&StagedSheet::new(name, css, source.to_path_buf()))
    }

    /// Number of distinct logical names staged so far.
    pub fn staged_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sheet(name: &str, css: &str, source: &str) -> StagedSheet {
        StagedSheet::new(name.to_string(), css.to_string(), PathBuf::from(source))
    }

    #[test]
    fn test_first_writer_creates_verbatim() {
        let temp = TempDir::new().unwrap();
        let mut merger = Merger::new(temp.path(), false);

        merger.stage(&sheet("site", "body{margin:0}", "/src/site.css")).unwrap();

        let written = fs::read_to_string(temp.path().join("site.css")).unwrap();
        assert_eq!(written, "body{margin:0}");
        assert_eq!(merger.staged_count(), 1);
    }

    #[test]
    fn test_collision_appends_when_auto_resolve() {
        let temp = TempDir::new().unwrap();
        let mut merger = Merger::new(temp.path(), true);

        merger.stage(&sheet("a", ".x{color:red}", "/src/a.css")).unwrap();
        merger.stage(&sheet("a", ".y{color:blue}", "/scss/a.scss")).unwrap();

        let written = fs::read_to_string(temp.path().join("a.css")).unwrap();
        assert_eq!(written, ".x{color:red}\n.y{color:blue}");
        assert_eq!(merger.staged_count(), 1);
    }

    #[test]
    fn test_collision_fails_without_auto_resolve() {
        let temp = TempDir::new().unwrap();
        let mut merger = Merger::new(temp.path(), false);

        merger.stage(&sheet("a", ".x{}", "/src/a.css")).unwrap();
        let err = merger
            .stage(&sheet("a", ".y{}", "/scss/a.scss"))
            .unwrap_err();

        let display = err.to_string();
        assert!(display.contains("Name collision for 'a.css'"));
        assert!(display.contains("/src/a.css"));
        assert!(display.contains("/scss/a.scss"));

        // First writer's content is intact, nothing was silently dropped
        let written = fs::read_to_string(temp.path().join("a.css")).unwrap();
        assert_eq!(written, ".x{}");
    }

    #[test]
    fn test_concatenation_preserves_processing_order() {
        let temp = TempDir::new().unwrap();
        let mut merger = Merger::new(temp.path(), true);

        merger.stage(&sheet("a", "first", "/1/a.css")).unwrap();
        merger.stage(&sheet("a", "second", "/2/a.css")).unwrap();
        merger.stage(&sheet("a", "third", "/3/a.css")).unwrap();

        let written = fs::read_to_string(temp.path().join("a.css")).unwrap();
        assert_eq!(written, "first\nsecond\nthird");
    }

    #[test]
    fn test_distinct_names_never_collide() {
        let temp = TempDir::new().unwrap();
        let mut merger = Merger::new(temp.path(), false);

        merger.stage(&sheet("a", ".a{}", "/src/a.css")).unwrap();
        merger.stage(&sheet("b", ".b{}", "/src/b.css")).unwrap();
        assert_eq!(merger.staged_count(), 2);
    }

    #[test]
    fn test_stage_file_reads_source() {
        let temp = TempDir::new().unwrap();
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("cards.css");
        fs::write(&source, ".card{padding:1rem}").unwrap();

        let mut merger = Merger::new(temp.path(), false);
        merger.stage_file(&source).unwrap();

        let written = fs::read_to_string(temp.path().join("cards.css")).unwrap();
        assert_eq!(written, ".card{padding:1rem}");
    }
}

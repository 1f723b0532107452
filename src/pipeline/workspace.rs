//! Staging workspace lifecycle.
//!
//! All pipeline output accumulates in a scoped staging directory which is
//! created empty at run start, populated and rewritten by the stages, and
//! consumed exactly once by delivery: the output directory is removed and
//! the staging directory renamed into its place. Until that rename the
//! output directory is never touched, so a failed run leaves any previous
//! build intact.
//!
//! The staging directory is a hidden sibling of the output directory so the
//! delivery rename never crosses a filesystem boundary. It is exclusive to
//! the current run; concurrent runs against the same output directory are
//! unsupported.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Scoped staging directory for one build run.
#[derive(Debug)]
pub struct Workspace {
    staging: PathBuf,
}

impl Workspace {
    /// Create a workspace handle for a build targeting `out_dir`.
    ///
    /// No filesystem access happens here; call [`Workspace::reset`] before
    /// staging anything.
    pub fn new(out_dir: &Path) -> Result<Workspace> {
        let name = out_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Workspace {
                message: format!(
                    "output directory '{}' has no usable name",
                    out_dir.display()
                ),
            })?;
        let parent = out_dir.parent().unwrap_or_else(|| Path::new("."));
        Ok(Workspace {
            staging: parent.join(format!(".{}.staging", name)),
        })
    }

    /// The staging directory path.
    pub fn staging(&self) -> &Path {
        &self.staging
    }

    /// Delete any pre-existing staging directory and create a fresh empty one.
    ///
    /// Removal failure is tolerated (the directory may not exist); creation
    /// failure after a successful removal is fatal.
    pub fn reset(&self) -> Result<()> {
        if let Err(e) = fs::remove_dir_all(&self.staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::debug!(
                    "could not remove stale staging directory '{}': {}",
                    self.staging.display(),
                    e
                );
            }
        }
        fs::create_dir_all(&self.staging).map_err(|e| Error::Workspace {
            message: format!(
                "failed to create staging directory '{}': {}",
                self.staging.display(),
                e
            ),
        })
    }

    /// Replace `out_dir` with the staging directory.
    ///
    /// This is the single commit point of the pipeline. Any existing output
    /// directory is removed first; the staging directory is then renamed
    /// into place. A rename failure is fatal and the staged content is lost
    /// (documented limitation, not retried).
    pub fn deliver(&self, out_dir: &Path) -> Result<()> {
        if let Err(e) = fs::remove_dir_all(out_dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(Error::Workspace {
                    message: format!(
                        "failed to remove previous output directory '{}': {}",
                        out_dir.display(),
                        e
                    ),
                });
            }
        }
        if let Some(parent) = out_dir.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Workspace {
                message: format!("failed to create '{}': {}", parent.display(), e),
            })?;
        }
        fs::rename(&self.staging, out_dir).map_err(|e| Error::Workspace {
            message: format!(
                "failed to move staged output into '{}': {}",
                out_dir.display(),
                e
            ),
        })
    }

    /// Best-effort removal of the staging directory. Never fails the run.
    pub fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(&self.staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::debug!(
                    "could not clean up staging directory '{}': {}",
                    self.staging.display(),
                    e
                );
            }
        }
    }
}

/// All `.css` files in the staging directory, sorted by file name.
///
/// Purge and minify operate on this set; sorting keeps their rewrite order
/// stable across reruns.
pub fn staged_css_files(staging: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(staging)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("css")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Replace a staged file's content via write-to-temp-then-rename.
///
/// The temporary file lives in the same directory, so the rename cannot
/// cross filesystems and the target never observably disappears.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("css.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `cssmonster` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! Failures fall into four families, all fatal:
//!
//! - Configuration errors: a bad or missing configuration value, detected
//!   before any file I/O takes place.
//! - Workspace/I/O errors: staging directory creation, removal, or the
//!   final rename into the output directory.
//! - Compile errors: an SCSS compile or CSS minify failure for a specific
//!   source file.
//! - Name collisions: two source files mapping to the same logical output
//!   name while `autoresolve` is disabled.
//!
//! Every stage fails the whole run; no partial or degraded output is ever
//! delivered. The binary prints a single human-readable message per failure
//! and exits non-zero.

use thiserror::Error;

/// Main error type for cssmonster operations
#[derive(Error, Debug)]
pub enum Error {
    /// An invalid or missing configuration value.
    ///
    /// This error includes the specific issue and optionally a hint about
    /// how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A staging or output directory operation failed.
    #[error("Workspace error: {message}")]
    Workspace { message: String },

    /// An SCSS compile or CSS minify failure for one source file.
    ///
    /// The message carries the compiler's own diagnostics, including line
    /// and column context where the compiler provides them.
    #[error("Compile error in {file}: {message}")]
    Compile { file: String, message: String },

    /// Two source files map to the same logical output name and
    /// `autoresolve` is disabled.
    #[error("Name collision for '{name}.css': {first} and {second} (rename one of them, or set autoresolve: true to concatenate)")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Build a configuration error without a hint.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Build a configuration error for a field whose value has the wrong shape.
    pub fn config_type(field: &str, expected: &str) -> Self {
        Error::Config {
            message: format!("{} must be {}", field, expected),
            hint: None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

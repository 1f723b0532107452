//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_css("site", "body { margin: 0 }");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration JSON snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Development build with collision merging enabled.
    pub const DEV_AUTORESOLVE: &str = r#"{ "env": "development", "autoresolve": true }"#;

    /// Development build, collisions fatal.
    pub const DEV_STRICT: &str = r#"{ "env": "development" }"#;

    /// Invalid JSON for error testing.
    pub const INVALID_JSON: &str = "{ outDir = nope }";

    /// A field with the wrong shape.
    pub const BAD_OUT_DIR: &str = r#"{ "outDir": 42 }"#;
}

/// A temporary project directory with `src/` sources and an optional
/// config file, matching what the binary expects to find in its working
/// directory.
pub struct TestFixture {
    pub temp: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp: assert_fs::TempDir::new().expect("create temp dir"),
        }
    }

    /// Path of the fixture's working directory.
    pub fn path(&self) -> &std::path::Path {
        self.temp.path()
    }

    /// Write a CSS source under `src/`.
    pub fn with_css(self, name: &str, content: &str) -> Self {
        self.temp
            .child(format!("src/{}.css", name))
            .write_str(content)
            .expect("write css source");
        self
    }

    /// Write an SCSS source under `src/`.
    pub fn with_scss(self, name: &str, content: &str) -> Self {
        self.temp
            .child(format!("src/{}.scss", name))
            .write_str(content)
            .expect("write scss source");
        self
    }

    /// Write a `cssmonster.json` config file.
    pub fn with_config(self, json: &str) -> Self {
        self.temp
            .child("cssmonster.json")
            .write_str(json)
            .expect("write config");
        self
    }

    /// Write an arbitrary file relative to the fixture root.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.temp
            .child(relative)
            .write_str(content)
            .expect("write file");
        self
    }

    /// Read a delivered sheet from the default output directory.
    pub fn output(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp.path().join("cssmonster").join(name))
            .expect("read output sheet")
    }

    /// Whether a delivered sheet exists in the default output directory.
    pub fn has_output(&self, name: &str) -> bool {
        self.temp.path().join("cssmonster").join(name).exists()
    }
}

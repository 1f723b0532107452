//! # Configuration Schema and Resolution
//!
//! This module defines the resolved configuration for a build run and the
//! logic that produces it. Resolution merges three layers, in order:
//!
//! 1. Built-in defaults (see [`crate::defaults`]).
//! 2. The CLI-level `--env` mode.
//! 3. An optional JSON config file (`cssmonster.json` or
//!    `cssmonster.config.json`, or an explicit `--config` path).
//!
//! Every optional field present in the config file is validated against its
//! expected shape (string, boolean, string-or-array, or object) before being
//! applied; a type mismatch is a fatal [`Error::Config`] naming the
//! offending field. String-or-array path fields are normalized to absolute
//! paths resolved against the working directory. Resolution performs no
//! filesystem access beyond reading the config file itself; source roots are
//! not checked for existence here (deferred to the collection stage).
//!
//! The derived-default step runs last: development mode forces `minify` and
//! `purge` to `false` unless the user config set those booleans explicitly.
//! An explicit user value always wins over a mode-derived default.
//!
//! The resulting [`Config`] is immutable and is passed by reference into
//! every pipeline stage; no stage mutates it.

use crate::defaults;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Build mode, selecting the default minify/purge behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Parse a mode string. `dev` is accepted as an alias for `development`.
    pub fn parse(value: &str) -> Result<Mode> {
        match value {
            "production" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            other => Err(Error::Config {
                message: format!(
                    "env must be 'production' or 'development', got '{}'",
                    other
                ),
                hint: None,
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Production => write!(f, "production"),
            Mode::Development => write!(f, "development"),
        }
    }
}

/// Options passed through to the purge stage.
///
/// Mirrors the `purgeCSS` object of the config file. `content` holds the
/// globs scanned for selector usage; `safelist` tokens are never purged.
/// Removal of unreferenced `@keyframes` and `@font-face` blocks is opt-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PurgeOptions {
    #[serde(deserialize_with = "string_or_seq")]
    pub content: Vec<String>,
    pub safelist: Vec<String>,
    pub keyframes: bool,
    pub font_face: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            content: defaults::PURGE_CONTENT.iter().map(|s| s.to_string()).collect(),
            safelist: Vec::new(),
            keyframes: false,
            font_face: false,
        }
    }
}

/// Fully resolved, immutable build configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Build mode; selects the derived minify/purge defaults.
    pub mode: Mode,
    /// Final destination directory. Never written to until delivery.
    pub out_dir: PathBuf,
    /// Ordered search roots for source files.
    pub source_roots: Vec<PathBuf>,
    /// Minify staged CSS before delivery.
    pub minify: bool,
    /// Purge unused selectors before delivery.
    pub purge: bool,
    /// Regex patterns; a source file whose path matches any pattern is
    /// excluded from collection.
    pub blacklist: Vec<String>,
    /// Ordered search paths handed to the SCSS compiler for import
    /// resolution.
    pub include_paths: Vec<PathBuf>,
    /// Purge stage pass-through options.
    pub purge_options: PurgeOptions,
    /// Collision policy: concatenate same-named outputs instead of failing.
    pub auto_resolve: bool,
}

impl Config {
    /// Resolve the effective configuration for a run.
    ///
    /// `cli_mode` is the mode from the `--env` flag (defaulting to
    /// production); a config-file `env` field overrides it. `overrides` is
    /// the parsed config file, if one was found.
    pub fn resolve(cwd: &Path, cli_mode: Option<Mode>, overrides: Option<&Value>) -> Result<Config> {
        let mut mode = cli_mode.unwrap_or(Mode::Production);
        let mut out_dir = cwd.join(defaults::OUT_DIR);
        let mut source_roots: Vec<PathBuf> =
            defaults::SOURCES.iter().map(|s| cwd.join(s)).collect();
        let mut blacklist = Vec::new();
        let mut include_paths = Vec::new();
        let mut purge_options = PurgeOptions::default();
        let mut auto_resolve = false;
        // Explicit user values are tracked separately so they can win over
        // the mode-derived defaults applied at the end.
        let mut explicit_minify = None;
        let mut explicit_purge = None;

        if let Some(value) = overrides {
            let object = value.as_object().ok_or_else(|| Error::Config {
                message: "config file must contain a JSON object".to_string(),
                hint: None,
            })?;

            for field in object.keys() {
                if !KNOWN_FIELDS.contains(&field.as_str()) {
                    return Err(Error::Config {
                        message: format!("unknown field '{}'", field),
                        hint: Some(format!("recognized fields: {}", KNOWN_FIELDS.join(", "))),
                    });
                }
            }

            if let Some(raw) = object.get("outDir") {
                out_dir = resolve_path(cwd, &expect_string("outDir", raw)?);
            }
            if let Some(raw) = object.get("sources") {
                source_roots = expect_string_or_list("sources", raw)?
                    .iter()
                    .map(|s| resolve_path(cwd, s))
                    .collect();
            }
            if let Some(raw) = object.get("env") {
                mode = Mode::parse(&expect_string("env", raw)?)?;
            }
            if let Some(raw) = object.get("minify") {
                explicit_minify = Some(expect_bool("minify", raw)?);
            }
            if let Some(raw) = object.get("purge") {
                explicit_purge = Some(expect_bool("purge", raw)?);
            }
            if let Some(raw) = object.get("blacklist") {
                blacklist = expect_string_or_list("blacklist", raw)?;
            }
            if let Some(raw) = object.get("include") {
                include_paths = expect_string_or_list("include", raw)?
                    .iter()
                    .map(|s| resolve_path(cwd, s))
                    .collect();
            }
            if let Some(raw) = object.get("purgeCSS") {
                if !raw.is_object() {
                    return Err(Error::Config {
                        message: "purgeCSS must be an object".to_string(),
                        hint: Some(
                            "recognized keys: content, safelist, keyframes, fontFace".to_string(),
                        ),
                    });
                }
                purge_options =
                    serde_json::from_value(raw.clone()).map_err(|e| Error::Config {
                        message: format!("invalid purgeCSS options: {}", e),
                        hint: None,
                    })?;
            }
            if let Some(raw) = object.get("autoresolve") {
                auto_resolve = expect_bool("autoresolve", raw)?;
            }
        }

        // Blacklist patterns are matched as regular expressions later; an
        // invalid pattern must fail the run before the workspace is touched.
        for pattern in &blacklist {
            Regex::new(pattern).map_err(|e| Error::Config {
                message: format!("blacklist pattern '{}' is not a valid regex: {}", pattern, e),
                hint: None,
            })?;
        }

        // Content globs are matched against absolute paths at purge time.
        purge_options.content = purge_options
            .content
            .iter()
            .map(|pattern| {
                if Path::new(pattern).is_absolute() {
                    pattern.clone()
                } else {
                    cwd.join(pattern).to_string_lossy().into_owned()
                }
            })
            .collect();

        // Derived-default step: development disables minify and purge unless
        // the user config set them explicitly.
        let derived = mode == Mode::Production;
        let minify = explicit_minify.unwrap_or(derived);
        let purge = explicit_purge.unwrap_or(derived);

        Ok(Config {
            mode,
            out_dir,
            source_roots,
            minify,
            purge,
            blacklist,
            include_paths,
            purge_options,
            auto_resolve,
        })
    }
}

/// The config-file fields the resolver recognizes.
const KNOWN_FIELDS: [&str; 9] = [
    "outDir",
    "sources",
    "env",
    "minify",
    "purge",
    "purgeCSS",
    "blacklist",
    "include",
    "autoresolve",
];

/// Locate the config file for a run.
///
/// An explicit `--config` path that does not exist is fatal. With no flag,
/// the default file names are probed in the working directory; none existing
/// simply means "defaults only" and `None` is returned.
pub fn locate_file(cwd: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        if !path.exists() {
            return Err(Error::Config {
                message: format!("missing config file '{}'", path.display()),
                hint: Some("Did you move the file without updating the --config flag?".to_string()),
            });
        }
        return Ok(Some(path));
    }

    for name in defaults::CONFIG_FILE_NAMES {
        let candidate = cwd.join(name);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Read and parse a config file into a JSON value.
pub fn load_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::Config {
        message: format!("failed to parse '{}': {}", path.display(), e),
        hint: Some("config files are plain JSON".to_string()),
    })
}

fn resolve_path(cwd: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn expect_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::config_type(field, "a string"))
}

fn expect_bool(field: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::config_type(field, "a boolean"))
}

fn expect_string_or_list(field: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                    Error::config_type(field, "a string or an array of strings")
                })
            })
            .collect(),
        _ => Err(Error::config_type(
            field,
            "a string or an array of strings",
        )),
    }
}

/// Deserialize a JSON string or array of strings into a `Vec<String>`.
fn string_or_seq<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(items) => items,
    })
}

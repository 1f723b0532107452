//! Purge stage: drop rules whose selectors no content file references.
//!
//! The stage resolves the configured content globs, extracts every literal
//! identifier token from the matched files, and then rewrites each staged
//! sheet keeping only the selectors whose identifier tokens all appear in
//! that token set (or in the safelist). Conditional group rules
//! (`@media`, `@supports`) are purged recursively and dropped when they end
//! up empty; statement at-rules are kept verbatim; `@keyframes` and
//! `@font-face` removal are opt-in. Rewrites are write-to-temp-then-rename
//! so a sheet never observably disappears mid-run.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::PurgeOptions;
use crate::error::{Error, Result};
use crate::pipeline::workspace;

/// Identifier tokens as they appear in markup and templates.
fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[A-Za-z0-9_-]+").unwrap())
}

/// Pseudo-classes and pseudo-elements, optionally functional.
fn pseudo_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"::?[A-Za-z-]+(\([^)]*\))?").unwrap())
}

/// Attribute selector segments.
fn attribute_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\[[^\]]*\]").unwrap())
}

/// Purge every staged sheet against the configured content files.
pub fn purge(staging: &Path, options: &PurgeOptions) -> Result<()> {
    let tokens = collect_content_tokens(&options.content)?;
    log::debug!("purging against {} content token(s)", tokens.len());

    let ctx = PurgeContext {
        tokens: &tokens,
        safelist: &options.safelist,
        keyframes: options.keyframes,
        font_face: options.font_face,
    };

    for path in workspace::staged_css_files(staging)? {
        let css = fs::read_to_string(&path)?;
        let purged = purge_stylesheet(&css, &ctx);
        if purged != css {
            workspace::write_atomic(&path, &purged)?;
            log::debug!("purged '{}'", path.display());
        }
    }
    Ok(())
}

/// Resolve the content globs and extract the identifier tokens they use.
fn collect_content_tokens(patterns: &[String]) -> Result<HashSet<String>> {
    let mut tokens = HashSet::new();
    let mut matched = 0usize;
    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry.map_err(|e| Error::Io(e.into_error()))?;
            if !path.is_file() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            for m in token_regex().find_iter(&content) {
                tokens.insert(m.as_str().to_string());
            }
            matched += 1;
        }
    }
    if matched == 0 {
        log::warn!("purge matched no content files; most selectors will be removed");
    }
    Ok(tokens)
}

struct PurgeContext<'a> {
    tokens: &'a HashSet<String>,
    safelist: &'a [String],
    keyframes: bool,
    font_face: bool,
}

impl PurgeContext<'_> {
    fn is_used(&self, token: &str) -> bool {
        self.tokens.contains(token) || self.safelist.iter().any(|s| s == token)
    }

    /// A selector survives when every identifier token it names is used.
    /// Selectors with no identifier tokens (`*`, `:root`) always survive.
    fn keep_selector(&self, selector: &str) -> bool {
        let stripped = pseudo_regex().replace_all(selector, " ");
        let stripped = attribute_regex().replace_all(&stripped, " ");
        token_regex()
            .find_iter(&stripped)
            .all(|m| self.is_used(m.as_str()))
    }
}

/// Purge one stylesheet's text.
fn purge_stylesheet(css: &str, ctx: &PurgeContext<'_>) -> String {
    purge_rules(&strip_comments(css), ctx)
}

fn purge_rules(css: &str, ctx: &PurgeContext<'_>) -> String {
    let mut out = String::new();
    let bytes = css.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        // Leading whitespace between rules collapses to what the emitter adds.
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let Some((prelude_end, delimiter)) = scan_prelude(css, i) else {
            // Trailing junk without a block; keep it as-is.
            push_rule(&mut out, css[i..].trim());
            break;
        };
        let prelude = css[i..prelude_end].trim();

        if delimiter == b';' {
            // Statement at-rule (@import, @charset, @namespace)
            push_rule(&mut out, &format!("{};", prelude));
            i = prelude_end + 1;
            continue;
        }

        let body_end = match find_block_end(css, prelude_end) {
            Some(end) => end,
            None => {
                // Unbalanced braces; keep the remainder untouched.
                push_rule(&mut out, css[i..].trim());
                break;
            }
        };
        let body = &css[prelude_end + 1..body_end];

        if let Some(kept) = purge_block(prelude, body, ctx) {
            push_rule(&mut out, &kept);
        }
        i = body_end + 1;
    }

    out
}

/// Decide what survives of a single `prelude { body }` block.
fn purge_block(prelude: &str, body: &str, ctx: &PurgeContext<'_>) -> Option<String> {
    if let Some(name) = at_rule_name(prelude) {
        return match name {
            "media" | "supports" => {
                let inner = purge_rules(body, ctx);
                if inner.trim().is_empty() {
                    None
                } else {
                    Some(format!("{} {{\n{}}}", prelude, indent(&inner)))
                }
            }
            "keyframes" | "-webkit-keyframes" => {
                if ctx.keyframes && !keyframes_used(prelude, ctx) {
                    None
                } else {
                    Some(format!("{} {{{}}}", prelude, body))
                }
            }
            "font-face" => {
                if ctx.font_face && !font_face_used(body, ctx) {
                    None
                } else {
                    Some(format!("{} {{{}}}", prelude, body))
                }
            }
            // @page and friends pass through untouched
            _ => Some(format!("{} {{{}}}", prelude, body)),
        };
    }

    let kept: Vec<&str> = prelude
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && ctx.keep_selector(s))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(format!("{} {{{}}}", kept.join(", "), body))
    }
}

/// The at-rule name of a prelude, if it is one.
fn at_rule_name(prelude: &str) -> Option<&str> {
    let rest = prelude.strip_prefix('@')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// An animation name survives when the content (or safelist) mentions it.
fn keyframes_used(prelude: &str, ctx: &PurgeContext<'_>) -> bool {
    prelude
        .split_whitespace()
        .nth(1)
        .is_some_and(|name| ctx.is_used(name.trim_matches(|c| c == '"' || c == '\'')))
}

/// A font face survives when its family name appears in the content.
fn font_face_used(body: &str, ctx: &PurgeContext<'_>) -> bool {
    for declaration in body.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        if property.trim().eq_ignore_ascii_case("font-family") {
            let family = value.trim().trim_matches(|c| c == '"' || c == '\'');
            return token_regex()
                .find_iter(family)
                .any(|m| ctx.is_used(m.as_str()));
        }
    }
    false
}

fn push_rule(out: &mut String, rule: &str) {
    if rule.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(rule);
    out.push('\n');
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

/// Find the end of a rule prelude: the position of the opening `{` or the
/// terminating `;`, whichever comes first outside of strings.
fn scan_prelude(css: &str, start: usize) -> Option<(usize, u8)> {
    let bytes = css.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let c = bytes[i];
        match quote {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'{' | b';' => return Some((i, c)),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Find the `}` matching the `{` at `open`, respecting nesting and strings.
fn find_block_end(css: &str, open: usize) -> Option<usize> {
    let bytes = css.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let c = bytes[i];
        match quote {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Remove `/* ... */` comments, respecting string literals.
fn strip_comments(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut span_start = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match quote {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    out.push_str(&css[span_start..i]);
                    let end = css[i + 2..]
                        .find("*/")
                        .map(|p| i + 2 + p + 2)
                        .unwrap_or(css.len());
                    i = end;
                    span_start = end;
                    continue;
                }
                if c == b'"' || c == b'\'' {
                    quote = Some(c);
                }
            }
        }
        i += 1;
    }
    out.push_str(&css[span_start..]);
    out
}

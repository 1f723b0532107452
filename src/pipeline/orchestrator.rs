//! Orchestrator for the complete build operation.
//!
//! This module coordinates all stages to provide a clean API for one build
//! run. Stages execute strictly in sequence; a failure in any of them
//! removes the staging directory before the error propagates, so the output
//! directory at the final destination is only ever replaced by a fully
//! staged build.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::workspace::{self, Workspace};
use crate::pipeline::{collect, compile, merge, minify, normalize, purge, BuildReport};

/// Execute the complete build pipeline.
///
/// 1. Reset the staging workspace
/// 2. Collect and stage hand-written CSS
/// 3. Collect, compile and stage SCSS
/// 4. Append the normalize/preflight baseline
/// 5. Purge unused selectors (when enabled)
/// 6. Minify staged sheets (when enabled)
/// 7. Deliver the staging directory over the output directory
pub fn execute_build(config: &Config) -> Result<BuildReport> {
    let workspace = Workspace::new(&config.out_dir)?;
    workspace.reset()?;

    let report = match run_stages(config, &workspace) {
        Ok(report) => report,
        Err(e) => {
            workspace.cleanup();
            return Err(e);
        }
    };

    if let Err(e) = workspace.deliver(&config.out_dir) {
        workspace.cleanup();
        return Err(e);
    }
    workspace.cleanup();
    Ok(report)
}

fn run_stages(config: &Config, workspace: &Workspace) -> Result<BuildReport> {
    let staging = workspace.staging();
    // One merger spans both passes: hand-written CSS and compiled SCSS
    // share a single collision domain.
    let mut merger = merge::Merger::new(staging, config.auto_resolve);

    log::info!("collecting CSS sources");
    let css_files = collect::collect_sources(&config.source_roots, "css")?;
    let css_files = collect::filter_blacklist(css_files, &config.blacklist)?;
    for file in &css_files {
        merger.stage_file(file)?;
    }

    log::info!("compiling SCSS sources");
    let scss_files = collect::collect_sources(&config.source_roots, "scss")?;
    let scss_files = collect::filter_blacklist(scss_files, &config.blacklist)?;
    let sheets = compile::compile_all(&scss_files, &config.include_paths, config.minify)?;
    let compiled = sheets.len();
    for sheet in &sheets {
        merger.stage(sheet)?;
    }

    log::info!("writing baseline sheets");
    normalize::apply(staging)?;

    if config.purge {
        log::info!("purging unused selectors");
        purge::purge(staging, &config.purge_options)?;
    }

    if config.minify {
        log::info!("minifying staged sheets");
        minify::minify_dir(staging)?;
    }

    let delivered = workspace::staged_css_files(staging)?.len();
    Ok(BuildReport {
        css_files: css_files.len(),
        scss_files: compiled,
        delivered,
    })
}

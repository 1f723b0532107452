//! Build command implementation
//!
//! The build command executes the full pipeline: collect CSS and SCSS
//! sources, compile, merge under the collision policy, append the
//! normalization baseline, optionally purge and minify, and deliver the
//! result atomically to the output directory.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "CSSMONSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build mode (production, development)
    #[arg(short, long, value_name = "MODE")]
    pub env: Option<String>,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    use cssmonster::config::{self, Config, Mode};
    use cssmonster::pipeline::orchestrator;

    let start_time = Instant::now();
    let cwd = std::env::current_dir()?;

    let cli_mode = args.env.as_deref().map(Mode::parse).transpose()?;

    let overrides = match config::locate_file(&cwd, args.config.as_deref())? {
        Some(path) => {
            if !args.quiet && args.verbose {
                println!("Using config: {}", path.display());
            }
            Some(config::load_file(&path)?)
        }
        None => None,
    };
    let config = Config::resolve(&cwd, cli_mode, overrides.as_ref())?;

    if !args.quiet {
        println!(
            "{} Running CSSMonster ({})",
            console::style(">").cyan().bold(),
            config.mode
        );
    }

    let spinner = if args.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("valid template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message("building stylesheets...");
        spinner
    };

    let result = orchestrator::execute_build(&config);
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            let duration = start_time.elapsed();
            if !args.quiet {
                println!(
                    "{} Built in {:.2}s",
                    console::style("ok").green().bold(),
                    duration.as_secs_f64()
                );
                println!(
                    "   {} CSS file(s), {} SCSS file(s), {} sheet(s) delivered",
                    report.css_files, report.scss_files, report.delivered
                );
                println!("   Output written to: {}", config.out_dir.display());
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Build failed", console::style("x").red().bold());
            }
            Err(e.into())
        }
    }
}

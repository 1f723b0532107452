//! CLI argument parsing and dispatch

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// CSSMonster - compile, merge, purge and minify CSS
#[derive(Parser, Debug)]
#[command(name = "cssmonster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    build: commands::build::BuildArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.color.as_str() {
            "always" => console::set_colors_enabled(true),
            "never" => console::set_colors_enabled(false),
            _ => {}
        }

        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        commands::build::execute(self.build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["cssmonster"]);
        assert_eq!(cli.color, "auto");
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_cli_env_flag() {
        let cli = Cli::parse_from(["cssmonster", "-e", "development"]);
        assert_eq!(cli.build.env.as_deref(), Some("development"));
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["cssmonster", "--config", "styles.json"]);
        assert_eq!(
            cli.build.config.as_deref(),
            Some(std::path::Path::new("styles.json"))
        );
    }
}

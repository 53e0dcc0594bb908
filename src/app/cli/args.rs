//! Command line arguments for the logger demo
//!
//! Every option is optional here so that values from the configuration file
//! can fill the gaps; defaults are applied when settings are resolved.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "consumer-pool")]
#[command(about = "Multi-threaded consumer queue demo: writes numbered lines to a log file")]
#[command(version)]
pub struct Args {
    /// File the demo appends its lines to
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 'w', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Number of lines to commit
    #[arg(short = 'n', long = "count", value_name = "COUNT")]
    pub count: Option<usize>,

    /// Discard queued lines on shutdown instead of draining them
    #[arg(long = "force", action = ArgAction::SetTrue)]
    pub force: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Application log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Application log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Application log file (use 'none' to log to stderr)
    #[arg(long = "app-log-file", value_name = "FILE")]
    pub app_log_file: Option<PathBuf>,

    /// Force colored application log output
    #[arg(long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored application log output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,
}

impl Args {
    /// Some(true) for --color, Some(false) for --no-color, None when neither was given
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

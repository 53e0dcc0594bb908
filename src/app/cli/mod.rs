//! Command line and configuration file handling

pub mod args;
pub mod config;

pub use args::Args;
pub use config::{load_config, resolve, ConfigError, FileConfig, Settings};

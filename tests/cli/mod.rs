//! CLI Integration Test Modules

pub mod app_logging;
pub mod argument_parsing;
pub mod toml_config;

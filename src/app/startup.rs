//! Application startup: configuration, logging, demo run

use super::cli::{load_config, resolve, Args, ConfigError};
use super::demo;
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::{init_logging, LoggingError};
use crate::logger::LoggerError;
use clap::Parser;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Logger(#[from] LoggerError),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Logging(_) => false,
            AppError::Logger(e) => e.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Logging(_) => None,
            AppError::Logger(e) => e.user_message(),
        }
    }
}

/// Parse the command line, run the demo and return the process exit code
pub fn startup() -> i32 {
    let args = Args::parse();

    // Logging is not up yet, so configuration problems go straight to stderr
    let loaded = load_config(args.config_file.as_deref()).and_then(|file| resolve(&args, file));
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Err(e) = init_logging(
        Some(&settings.log_level),
        settings.log_format,
        settings.app_log_file.as_deref(),
        settings.use_color(),
    ) {
        eprintln!("Error initialising logging: {}", e);
        return 1;
    }

    log::info!(
        "consumer-pool {} ({}, built {}) starting",
        env!("CARGO_PKG_VERSION"),
        crate::GIT_HASH,
        crate::BUILD_TIME
    );
    log::debug!("settings: {:?}", settings);

    match demo::run(&settings.demo).map_err(AppError::from) {
        Ok(report) => {
            log::info!(
                "{} line(s) accepted, {} rejected ({} stop)",
                report.accepted,
                report.rejected,
                if settings.demo.forced { "forced" } else { "graceful" }
            );
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Running logger demo");
            1
        }
    }
}

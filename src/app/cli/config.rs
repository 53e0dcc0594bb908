//! TOML configuration file loading and settings resolution
//!
//! Precedence is command line, then configuration file, then built-in
//! defaults. Without `--config-file` the default location is used only when
//! the file exists.

use crate::app::demo::{DemoSettings, DEFAULT_COUNT, DEFAULT_OUTPUT, DEFAULT_WORKERS};
use crate::core::error_handling::ContextualError;
use crate::core::logging::LogFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::args::Args;

pub const CONFIG_DIR_NAME: &str = "ConsumerPool";
pub const CONFIG_FILE_NAME: &str = "consumer-pool.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid(message) => Some(message.as_str()),
            ConfigError::NotFound { .. } => Some("The specified configuration file does not exist"),
            ConfigError::Parse { .. } => Some("The configuration file is not valid TOML"),
            ConfigError::Read { .. } => None,
        }
    }
}

/// Values accepted in the configuration file; keys match the long options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub log_file: Option<PathBuf>,
    pub workers: Option<usize>,
    pub count: Option<usize>,
    pub force: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub app_log_file: Option<PathBuf>,
    pub color: Option<bool>,
}

impl FileConfig {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub demo: DemoSettings,
    pub log_level: String,
    pub log_format: LogFormat,
    pub app_log_file: Option<PathBuf>,
    pub color: Option<bool>,
}

impl Settings {
    /// Whether application log output should be colored
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        self.color.unwrap_or_else(|| std::io::stderr().is_terminal())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration file named on the command line, or the default one
///
/// An explicitly named file must exist; a missing default file yields `None`.
pub fn load_config(config_file: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    FileConfig::parse(&contents, &path).map(Some)
}

// "none" and "-" select stderr instead of a file
fn app_log_destination(path: PathBuf) -> Option<PathBuf> {
    match path.to_str() {
        Some(s) if s.eq_ignore_ascii_case("none") || s == "-" => None,
        _ => Some(path),
    }
}

/// Merge arguments over the file configuration and apply defaults
pub fn resolve(args: &Args, file: Option<FileConfig>) -> Result<Settings, ConfigError> {
    let file = file.unwrap_or_default();

    let output = args
        .log_file
        .clone()
        .or(file.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    if output.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "The output log file path must not be empty".to_string(),
        ));
    }

    let workers = args.workers.or(file.workers).unwrap_or(DEFAULT_WORKERS);
    if workers == 0 {
        return Err(ConfigError::Invalid(
            "At least one worker thread is required".to_string(),
        ));
    }

    let format_name = args
        .log_format
        .clone()
        .or(file.log_format)
        .unwrap_or_else(|| "text".to_string());
    let log_format = LogFormat::parse(&format_name).ok_or_else(|| {
        ConfigError::Invalid(format!(
            "Unknown log format '{}' (expected text, ext or json)",
            format_name
        ))
    })?;

    Ok(Settings {
        demo: DemoSettings {
            output,
            workers,
            count: args.count.or(file.count).unwrap_or(DEFAULT_COUNT),
            forced: args.force || file.force.unwrap_or(false),
        },
        log_level: args
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| "info".to_string()),
        log_format,
        app_log_file: args
            .app_log_file
            .clone()
            .or(file.app_log_file)
            .and_then(app_log_destination),
        color: args.color_override().or(file.color),
    })
}

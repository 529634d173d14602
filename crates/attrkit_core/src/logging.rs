//! Logging bootstrap for hosts embedding attrkit.
//!
//! # Responsibility
//! - Resolve logging configuration from explicit values or the environment.
//! - Start the `flexi_logger` backend at most once per process.
//!
//! # Invariants
//! - Initialization is idempotent for an identical config.
//! - A conflicting re-initialization is rejected, never applied.
//! - Initialization never panics.
//!
//! Library code only uses the `log` facade with
//! `event=<name> module=<module> status=<ok|error>` lines; nothing is emitted
//! until a host calls `init_logging`.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "ATTRKIT_LOG_LEVEL";
/// Environment variable holding an absolute log directory.
pub const ENV_LOG_DIR: &str = "ATTRKIT_LOG_DIR";

const LOG_FILE_BASENAME: &str = "attrkit";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    config: LoggingConfig,
    _logger: LoggerHandle,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Normalized level (`trace|debug|info|warn|error`).
    pub level: &'static str,
    /// Rolling file directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Builds a config from raw values.
    ///
    /// # Errors
    /// - `UnsupportedLevel` for unknown levels.
    /// - `InvalidLogDir` for empty or relative directories.
    pub fn new(level: &str, log_dir: Option<&str>) -> Result<Self, LoggingError> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: log_dir.map(normalize_log_dir).transpose()?,
        })
    }

    /// Reads `ATTRKIT_LOG_LEVEL` and `ATTRKIT_LOG_DIR`.
    ///
    /// Missing variables fall back to defaults.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let level = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty());
        let log_dir = lookup(ENV_LOG_DIR).filter(|value| !value.trim().is_empty());
        Self::new(
            level.as_deref().unwrap_or(default_log_level()),
            log_dir.as_deref(),
        )
    }
}

/// Logging bootstrap errors.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidLogDir(String),
    CreateLogDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logging already runs with a different config.
    Conflict {
        active: LoggingConfig,
        requested: LoggingConfig,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidLogDir(message) => write!(f, "invalid log directory: {message}"),
            Self::CreateLogDir { path, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with {}; refusing to switch to {}",
                describe(active),
                describe(requested)
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateLogDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts logging with `config`.
///
/// # Errors
/// - `Conflict` when logging already runs with another config.
/// - `CreateLogDir` / `Backend` when the backend cannot start.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        let logger = start_backend(config)?;
        info!(
            "event=logging_init module=logging status=ok level={} target={} version={}",
            config.level,
            config
                .log_dir
                .as_deref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "stderr".to_string()),
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            config: config.clone(),
            _logger: logger,
        })
    })?;

    if &state.config != config {
        return Err(LoggingError::Conflict {
            active: state.config.clone(),
            requested: config.clone(),
        });
    }
    Ok(())
}

/// Returns the active config, or `None` before `init_logging`.
pub fn logging_status() -> Option<LoggingConfig> {
    LOGGING_STATE.get().map(|state| state.config.clone())
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_backend(config: &LoggingConfig) -> Result<LoggerHandle, LoggingError> {
    let logger = Logger::try_with_str(config.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    let logger = match config.log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateLogDir {
                path: dir.to_path_buf(),
                source,
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format),
    };

    logger
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::InvalidLogDir("path is empty".to_string()));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::InvalidLogDir(format!(
            "`{trimmed}` is not absolute"
        )));
    }
    Ok(path.to_path_buf())
}

fn describe(config: &LoggingConfig) -> String {
    match config.log_dir.as_deref() {
        Some(dir) => format!("level `{}` at `{}`", config.level, dir.display()),
        None => format!("level `{}` on stderr", config.level),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, LoggingConfig, LoggingError, ENV_LOG_DIR,
        ENV_LOG_LEVEL,
    };
    use std::collections::HashMap;

    #[test]
    fn normalize_level_accepts_aliases_and_case() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(normalize_level("Trace").unwrap(), "trace");
        assert!(matches!(
            normalize_level("verbose"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn config_rejects_relative_log_dir() {
        let err = LoggingConfig::new("info", Some("logs/dev")).expect_err("relative dir");
        assert!(err.to_string().contains("not absolute"));
    }

    #[test]
    fn from_lookup_reads_variables_and_defaults() {
        let vars = HashMap::from([(ENV_LOG_LEVEL, "error".to_string())]);
        let config = LoggingConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.level, "error");
        assert_eq!(config.log_dir, None);

        let empty = LoggingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(empty, LoggingConfig::default());

        let bad_dir = HashMap::from([(ENV_LOG_DIR, "relative".to_string())]);
        assert!(LoggingConfig::from_lookup(|key| bad_dir.get(key).cloned()).is_err());
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let dir_str = dir.path().to_str().expect("utf-8 temp dir");
        let config = LoggingConfig::new("info", Some(dir_str)).unwrap();

        init_logging(&config).expect("first init");
        init_logging(&config).expect("same config is idempotent");

        let other_level = LoggingConfig::new("debug", Some(dir_str)).unwrap();
        let err = init_logging(&other_level).expect_err("level conflict");
        assert!(err.to_string().contains("refusing to switch"));

        let stderr = LoggingConfig::new("info", None).unwrap();
        assert!(matches!(
            init_logging(&stderr),
            Err(LoggingError::Conflict { .. })
        ));

        assert_eq!(logging_status(), Some(config));
    }
}

// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::lexical::{MAX_LINE_LENGTH_CEILING, MAX_TAB_WIDTH};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a .py extension
    pub require_py_extension: bool,

    /// Whether to log file timings and sizes
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_py_extension: env_flag(env_vars::REQUIRE_PY_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Columns a tab advances to when measuring indentation
    pub tab_width: usize,

    /// Lines longer than this are reported as warnings
    pub max_line_length: Option<usize>,

    /// Whether to compute per-kind token counts after a scan
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            tab_width: env::var(env_vars::TAB_WIDTH)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::config::compile_time::lexical::DEFAULT_TAB_WIDTH),
            max_line_length: env::var(env_vars::MAX_LINE_LENGTH)
                .ok()
                .and_then(|v| v.parse().ok()),
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the loggers
    pub min_log_level: LogLevel,

    /// Whether to print a cargo-style summary after processing
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading or validating runtime preferences
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read preferences file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid preferences file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("tab_width must be between 1 and {max}, got {value}")]
    TabWidthOutOfRange { value: usize, max: usize },

    #[error("max_line_length must be between 1 and {max}, got {value}")]
    LineLengthOutOfRange { value: usize, max: usize },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML file; missing sections fall back to environment defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: RuntimeConfig = toml::from_str(&content).map_err(|source| {
            ConfigError::Parse {
                path: display,
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check preferences against compile-time limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tab_width = self.lexical.tab_width;
        if tab_width == 0 || tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::TabWidthOutOfRange {
                value: tab_width,
                max: MAX_TAB_WIDTH,
            });
        }

        if let Some(limit) = self.lexical.max_line_length {
            if limit == 0 || limit > MAX_LINE_LENGTH_CEILING {
                return Err(ConfigError::LineLengthOutOfRange {
                    value: limit,
                    max: MAX_LINE_LENGTH_CEILING,
                });
            }
        }

        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_PY_EXTENSION: &str = "PYLEX_REQUIRE_PY_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "PYLEX_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const TAB_WIDTH: &str = "PYLEX_TAB_WIDTH";
    pub const MAX_LINE_LENGTH: &str = "PYLEX_MAX_LINE_LENGTH";
    pub const LEXICAL_DETAILED_METRICS: &str = "PYLEX_LEXICAL_DETAILED_METRICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "PYLEX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "PYLEX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "PYLEX_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "PYLEX_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "PYLEX_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_load_partial_preferences_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lexical]\ntab_width = 8\nmax_line_length = 100").unwrap();

        let config = RuntimeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.lexical.tab_width, 8);
        assert_eq!(config.lexical.max_line_length, Some(100));
    }

    #[test]
    fn test_tab_width_validation() {
        let mut config = RuntimeConfig::default();
        config.lexical.tab_width = 0;
        assert_matches!(
            config.validate(),
            Err(ConfigError::TabWidthOutOfRange { value: 0, .. })
        );

        config.lexical.tab_width = 4;
        config.lexical.max_line_length = Some(MAX_LINE_LENGTH_CEILING + 1);
        assert_matches!(
            config.validate(),
            Err(ConfigError::LineLengthOutOfRange { .. })
        );
    }

    #[test]
    fn test_malformed_preferences_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lexical\ntab_width = ").unwrap();

        let result = RuntimeConfig::load_from_file(file.path());
        assert_matches!(result, Err(ConfigError::Parse { .. }));
    }
}

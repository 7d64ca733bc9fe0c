// RUNTIME PREFERENCES (User Experience)

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
    /// Whether to reject files without the .mfront extension
    pub require_mfront_extension: bool,

    /// Whether to log size and throughput metrics after reading a file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_mfront_extension: env_flag(env_vars::REQUIRE_MFRONT_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerPreferences {
    /// Fold `#include`, `#define`, ... and the rest of their line into one token
    pub treat_preprocessor_directives: bool,

    /// Split words on C++ separators and rejoin multi-character operators
    pub split_tokens: bool,

    /// Peel numeric literals out of words (`a+1` gives `a`, `+`, `1`)
    pub extract_numbers: bool,

    /// Read `'...'` like a string literal instead of a character literal
    pub char_as_string: bool,
}

impl Default for TokenizerPreferences {
    fn default() -> Self {
        Self {
            treat_preprocessor_directives: env_flag(env_vars::TOKENIZER_PREPROCESSOR, true),
            split_tokens: env_flag(env_vars::TOKENIZER_SPLIT_TOKENS, true),
            extract_numbers: env_flag(env_vars::TOKENIZER_EXTRACT_NUMBERS, true),
            char_as_string: env_flag(env_vars::TOKENIZER_CHAR_AS_STRING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DslPreferences {
    /// Emit `#line N "file"` markers in copied code blocks
    pub register_line_directives: bool,

    /// Report questionable but accepted constructs as warnings
    pub pedantic: bool,

    /// Debug mode never emits `#line` markers
    pub debug_mode: bool,
}

impl DslPreferences {
    /// Whether `#line` directives end up in generated code
    pub fn emit_line_directives(&self) -> bool {
        self.register_line_directives && !self.debug_mode
    }
}

impl Default for DslPreferences {
    fn default() -> Self {
        Self {
            register_line_directives: env_flag(env_vars::DSL_REGISTER_LINES, true),
            pedantic: env_flag(env_vars::DSL_PEDANTIC, false),
            debug_mode: env_flag(env_vars::DSL_DEBUG_MODE, false),
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

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
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

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub tokenizer: TokenizerPreferences,
    pub dsl: DslPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text; missing tables keep their defaults
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load preferences from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File processing
    pub const REQUIRE_MFRONT_EXTENSION: &str = "MFRONT_REQUIRE_MFRONT_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "MFRONT_ENABLE_PERFORMANCE_LOGGING";

    // Tokenizer
    pub const TOKENIZER_PREPROCESSOR: &str = "MFRONT_TOKENIZER_PREPROCESSOR";
    pub const TOKENIZER_SPLIT_TOKENS: &str = "MFRONT_TOKENIZER_SPLIT_TOKENS";
    pub const TOKENIZER_EXTRACT_NUMBERS: &str = "MFRONT_TOKENIZER_EXTRACT_NUMBERS";
    pub const TOKENIZER_CHAR_AS_STRING: &str = "MFRONT_TOKENIZER_CHAR_AS_STRING";

    // DSL
    pub const DSL_REGISTER_LINES: &str = "MFRONT_DSL_REGISTER_LINES";
    pub const DSL_PEDANTIC: &str = "MFRONT_DSL_PEDANTIC";
    pub const DSL_DEBUG_MODE: &str = "MFRONT_DSL_DEBUG_MODE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "MFRONT_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "MFRONT_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "MFRONT_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "MFRONT_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_debug_mode_disables_line_directives() {
        let prefs = DslPreferences {
            register_line_directives: true,
            pedantic: false,
            debug_mode: true,
        };
        assert!(!prefs.emit_line_directives());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            "[tokenizer]\nchar_as_string = true\n\n[dsl]\npedantic = true\n",
            "inline",
        )
        .unwrap();
        assert!(config.tokenizer.char_as_string);
        assert!(config.dsl.pedantic);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = RuntimeConfig::from_toml_str("[tokenizer\n", "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_env_var_names_are_prefixed() {
        for name in [
            env_vars::REQUIRE_MFRONT_EXTENSION,
            env_vars::TOKENIZER_EXTRACT_NUMBERS,
            env_vars::DSL_PEDANTIC,
            env_vars::LOGGING_MIN_LEVEL,
        ] {
            assert!(name.starts_with("MFRONT_"));
        }
    }
}

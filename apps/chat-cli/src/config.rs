//! Centralized configuration for chat-cli.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than halfway through a script.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// How command results are printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log format (default: pretty)
    pub log_format: LogFormat,
    /// Result format on stdout (default: text)
    pub output_format: OutputFormat,
    /// Script to run; a positional argument overrides it, stdin is the fallback
    pub script_path: Option<PathBuf>,
    /// Stop at the first failing command
    pub strict: bool,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Log format
        let log_format = LogFormat::from_str(&get("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        // Output format; unknown values are rejected rather than guessed
        let output_raw = get("OUTPUT_FORMAT").unwrap_or_else(|| "text".into());
        let output_format = OutputFormat::parse(&output_raw).ok_or_else(|| ConfigError {
            field: "OUTPUT_FORMAT",
            message: format!("expected 'text' or 'json', got '{}'", output_raw),
        })?;

        // Script path must point at an existing file when given
        let script_path = get("CHAT_SCRIPT")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        if let Some(ref path) = script_path {
            if !path.is_file() {
                return Err(ConfigError {
                    field: "CHAT_SCRIPT",
                    message: format!("no such file: {}", path.display()),
                });
            }
        }

        // Strict mode
        let strict_raw = get("CHAT_STRICT").unwrap_or_default();
        let strict = matches!(strict_raw.to_lowercase().as_str(), "1" | "true" | "yes");

        Ok(Self {
            log_format,
            output_format,
            script_path,
            strict,
        })
    }

    /// Log the effective configuration once tracing is up.
    pub fn log_summary(&self) {
        tracing::debug!(
            log_format = ?self.log_format,
            output_format = ?self.output_format,
            script = ?self.script_path,
            strict = self.strict,
            "configuration loaded"
        );
    }
}

//! # Builder Configuration
//!
//! Process-level settings loaded from environment variables.

use std::str::FromStr;

use crate::constants::{DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL};

/// Serialization format of rendered workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Multi-document YAML stream
    Yaml,
    /// JSON array
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected yaml or json)")),
        }
    }
}

/// Builder process configuration
///
/// All settings have defaults and can be overridden via environment variables.
/// Command-line flags take precedence over the environment.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Format of rendered workloads
    pub output_format: OutputFormat,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            log_enable_color: false,
            output_format: OutputFormat::Yaml,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
            log_enable_color: lookup("LOG_ENABLE_COLOR").is_some_and(|v| parse_bool(&v)),
            output_format: lookup("OUTPUT_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(OutputFormat::Yaml),
        }
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

fn parse_bool(value: &str) -> bool {
    let v_lower = value.to_lowercase();
    v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
}

//! Runtime configuration.
//!
//! Settings come from `SUI_TXKIT_*` environment variables; the CLI applies its own
//! flags on top with [`TxkitConfig::with_overrides`].
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | `SUI_TXKIT_LOG` | `warn` | log filter when `RUST_LOG` is unset |
//! | `SUI_TXKIT_OUTPUT` | `json` | `json`, `hex` or `base64` |
//! | `SUI_TXKIT_NORMALIZE_ADDRESSES` | `false` | print type tags with 64-digit addresses |
//! | `SUI_TXKIT_KEY` | unset | hex Ed25519 secret used by `sign` |

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

pub const ENV_LOG: &str = "SUI_TXKIT_LOG";
pub const ENV_OUTPUT: &str = "SUI_TXKIT_OUTPUT";
pub const ENV_NORMALIZE_ADDRESSES: &str = "SUI_TXKIT_NORMALIZE_ADDRESSES";
pub const ENV_KEY: &str = "SUI_TXKIT_KEY";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ============================================================================
// Environment helpers
// ============================================================================

/// Parse an environment variable. `None` if unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, falling back to `default`.
///
/// ```
/// use sui_txkit::config::env_var_or;
///
/// let retries: u32 = env_var_or("SUI_TXKIT_DOC_UNSET", 3);
/// assert_eq!(retries, 3);
/// ```
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `1`, `true`, `yes` and `on` (any case) are true; any other value is false.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Non-empty string value, or `None`.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Config
// ============================================================================

/// How commands print the bytes they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Hex,
    Base64,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "hex" => Ok(OutputFormat::Hex),
            "base64" | "b64" => Ok(OutputFormat::Base64),
            other => Err(anyhow!(
                "unknown output format '{}', expected json, hex or base64",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Hex => "hex",
            OutputFormat::Base64 => "base64",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxkitConfig {
    pub log_level: String,
    pub output: OutputFormat,
    pub normalize_addresses: bool,
    /// Hex secret key for signing.
    pub key: Option<String>,
}

impl Default for TxkitConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            output: OutputFormat::Json,
            normalize_addresses: false,
            key: None,
        }
    }
}

impl TxkitConfig {
    /// Read the `SUI_TXKIT_*` variables. An unrecognised output format is an error
    /// rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let output = match env_string(ENV_OUTPUT) {
            Some(v) => v
                .parse::<OutputFormat>()
                .with_context(|| format!("invalid {}", ENV_OUTPUT))?,
            None => OutputFormat::default(),
        };
        Ok(Self {
            log_level: env_string_or(ENV_LOG, DEFAULT_LOG_LEVEL),
            output,
            normalize_addresses: env_bool_or(ENV_NORMALIZE_ADDRESSES, false),
            key: env_string(ENV_KEY),
        })
    }

    /// Apply command-line values; `None` keeps the environment's value.
    pub fn with_overrides(
        mut self,
        output: Option<OutputFormat>,
        normalize_addresses: bool,
        log_level: Option<String>,
    ) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        if normalize_addresses {
            self.normalize_addresses = true;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_or() {
        std::env::set_var("SUI_TXKIT_TEST_U64", "100");
        assert_eq!(env_var_or("SUI_TXKIT_TEST_U64", 50u64), 100);
        assert_eq!(env_var_or("SUI_TXKIT_TEST_MISSING_1", 50u64), 50);
        std::env::set_var("SUI_TXKIT_TEST_U64", "not a number");
        assert_eq!(env_var_or("SUI_TXKIT_TEST_U64", 50u64), 50);
        std::env::remove_var("SUI_TXKIT_TEST_U64");
    }

    #[test]
    fn test_env_bool_or() {
        std::env::set_var("SUI_TXKIT_TEST_BOOL_A", "YES");
        std::env::set_var("SUI_TXKIT_TEST_BOOL_B", "0");
        assert!(env_bool_or("SUI_TXKIT_TEST_BOOL_A", false));
        assert!(!env_bool_or("SUI_TXKIT_TEST_BOOL_B", true));
        assert!(env_bool_or("SUI_TXKIT_TEST_MISSING_2", true));
        std::env::remove_var("SUI_TXKIT_TEST_BOOL_A");
        std::env::remove_var("SUI_TXKIT_TEST_BOOL_B");
    }

    #[test]
    fn test_env_string() {
        std::env::set_var("SUI_TXKIT_TEST_STR", "  ");
        assert_eq!(env_string("SUI_TXKIT_TEST_STR"), None);
        assert_eq!(env_string_or("SUI_TXKIT_TEST_MISSING_3", "d"), "d");
        std::env::remove_var("SUI_TXKIT_TEST_STR");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("HEX".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!("b64".parse::<OutputFormat>().unwrap(), OutputFormat::Base64);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Base64.to_string(), "base64");
    }

    #[test]
    fn test_overrides() {
        let config = TxkitConfig::default().with_overrides(
            Some(OutputFormat::Hex),
            true,
            Some("debug".to_string()),
        );
        assert_eq!(config.output, OutputFormat::Hex);
        assert!(config.normalize_addresses);
        assert_eq!(config.log_level, "debug");

        let untouched = TxkitConfig::default().with_overrides(None, false, None);
        assert_eq!(untouched, TxkitConfig::default());
    }
}

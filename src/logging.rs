//! Logging setup for the binary.
//!
//! Logs go to stderr so stdout carries only command output.

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

/// Build the filter: `RUST_LOG` wins, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| anyhow!("invalid log filter '{}': {}", default_directive, e)),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_directive)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("setting default subscriber failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_is_reported() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(env_filter("info").is_ok());
        assert!(env_filter("sui_txkit=notalevel").is_err());
    }
}

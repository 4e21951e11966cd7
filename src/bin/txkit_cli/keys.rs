//! `keygen`, `address` and `sign`.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use sui_txkit::bcs::base64_encode;
use sui_txkit::types::crypto::SuiKeyPair;
use sui_txkit::types::{SignedTransaction, TransactionData};
use sui_txkit::{OutputFormat, TxkitConfig};
use tracing::warn;

use super::output::print_json;
use super::{read_bytes, read_input};

/// Accepts a hex secret (64 digits, `0x` optional) or a Base64 keystore entry.
pub fn parse_key(text: &str) -> Result<SuiKeyPair> {
    let text = text.trim();
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(SuiKeyPair::from_hex(digits)?);
    }
    SuiKeyPair::from_base64(text).context("key is neither 64 hex digits nor a Base64 keystore entry")
}

fn resolve_key(flag: Option<&str>, config: &TxkitConfig) -> Result<SuiKeyPair> {
    let text = flag
        .map(str::to_string)
        .or_else(|| config.key.clone())
        .ok_or_else(|| anyhow!("no signing key: pass --key or set SUI_TXKIT_KEY"))?;
    parse_key(&text)
}

#[derive(Parser, Debug)]
pub struct KeygenCmd {}

impl KeygenCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let key = SuiKeyPair::generate();
        match config.output {
            OutputFormat::Json => print_json(&json!({
                "address": key.address().to_string(),
                "public_key": base64_encode(&key.public_key_bytes()),
                "secret_key": format!("0x{}", key.secret_hex()),
                "keystore": key.to_base64(),
                "scheme": "ed25519",
            })),
            OutputFormat::Hex => {
                println!("0x{}", key.secret_hex());
                Ok(())
            }
            OutputFormat::Base64 => {
                println!("{}", key.to_base64());
                Ok(())
            }
        }
    }
}

#[derive(Parser, Debug)]
pub struct AddressCmd {
    /// Secret key (hex or keystore Base64); defaults to SUI_TXKIT_KEY
    #[arg(long)]
    pub key: Option<String>,
}

impl AddressCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let key = resolve_key(self.key.as_deref(), config)?;
        match config.output {
            OutputFormat::Json => print_json(&json!({ "address": key.address().to_string() })),
            _ => {
                println!("{}", key.address());
                Ok(())
            }
        }
    }
}

#[derive(Parser, Debug)]
pub struct SignCmd {
    /// BCS `TransactionData` as Base64 or 0x-hex (`-` reads stdin), or the message
    /// text with --personal-message
    pub input: String,

    /// Secret key (hex or keystore Base64); defaults to SUI_TXKIT_KEY
    #[arg(long)]
    pub key: Option<String>,

    /// Sign the input as a UTF-8 personal message instead of a transaction
    #[arg(long)]
    pub personal_message: bool,
}

impl SignCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let key = resolve_key(self.key.as_deref(), config)?;

        if self.personal_message {
            let message = read_input(&self.input)?;
            let signature = key.sign_personal_message(message.as_bytes())?;
            return match config.output {
                OutputFormat::Json => print_json(&json!({
                    "message": base64_encode(message.as_bytes()),
                    "signature": signature.to_base64(),
                    "signer": key.address().to_string(),
                })),
                _ => {
                    println!("{}", signature);
                    Ok(())
                }
            };
        }

        let bytes = read_bytes(&self.input, "transaction bytes")?;
        let data =
            TransactionData::from_bytes(&bytes).context("failed to decode TransactionData")?;
        if data.sender() != key.address() {
            warn!(
                signer = %key.address(),
                sender = %data.sender(),
                "signing key is not the transaction sender"
            );
        }
        let signed = SignedTransaction::sign(data, &key)?;
        let (tx_bytes, signatures) = signed.to_execute_params()?;

        match config.output {
            OutputFormat::Json => print_json(&json!({
                "digest": signed.digest()?.to_string(),
                "tx_bytes": tx_bytes,
                "signatures": signatures,
            })),
            _ => {
                for signature in signatures {
                    println!("{}", signature);
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_forms() {
        let hex_key = "0x".to_string() + &"07".repeat(32);
        let from_hex = parse_key(&hex_key).unwrap();
        let from_b64 = parse_key(&from_hex.to_base64()).unwrap();
        assert_eq!(from_hex.address(), from_b64.address());
        assert!(parse_key("garbage").is_err());
    }

    #[test]
    fn test_resolve_key_prefers_flag() {
        let config = TxkitConfig {
            key: Some("01".repeat(32)),
            ..TxkitConfig::default()
        };
        let flag = "02".repeat(32);
        let from_flag = resolve_key(Some(&flag), &config).unwrap();
        let from_env = resolve_key(None, &config).unwrap();
        assert_ne!(from_flag.address(), from_env.address());
        assert!(resolve_key(None, &TxkitConfig::default()).is_err());
    }
}

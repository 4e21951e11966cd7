//! `decode-tx` and `digest`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use sui_txkit::types::resolution::{resolve_transaction_data, StaticSignatures};
use sui_txkit::types::{SuiAddress, TransactionData};
use sui_txkit::{OutputFormat, TxkitConfig};
use tracing::debug;

use super::output::{print_bytes, print_json};
use super::read_bytes;

#[derive(Parser, Debug)]
pub struct DecodeTxCmd {
    /// BCS `TransactionData` as Base64 or 0x-hex (`-` reads stdin)
    pub tx_bytes: String,

    /// JSON file mapping "0xPKG::module::function" to its parameter types,
    /// used to give pure inputs their logical types
    #[arg(long, value_name = "FILE")]
    pub signatures: Option<PathBuf>,
}

impl DecodeTxCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let bytes = read_bytes(&self.tx_bytes, "transaction bytes")?;
        let mut tx =
            TransactionData::from_bytes(&bytes).context("failed to decode TransactionData")?;

        if let Some(path) = &self.signatures {
            let signatures = load_signatures(path)?;
            debug!(functions = signatures.len(), "resolving pure inputs");
            tx = resolve_transaction_data(&tx, &signatures)
                .context("failed to resolve pure inputs")?;
        }

        match config.output {
            OutputFormat::Json => print_json(&json!({
                "digest": tx.digest()?.to_string(),
                "sender": tx.sender().to_string(),
                "transaction": tx,
            })),
            // canonical re-encoding of what was read
            format => print_bytes(&tx.to_bytes()?, format),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DigestCmd {
    /// BCS `TransactionData` as Base64 or 0x-hex (`-` reads stdin)
    pub tx_bytes: String,
}

impl DigestCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let bytes = read_bytes(&self.tx_bytes, "transaction bytes")?;
        let tx =
            TransactionData::from_bytes(&bytes).context("failed to decode TransactionData")?;
        let digest = tx.digest()?;
        match config.output {
            OutputFormat::Json => print_json(&json!({ "digest": digest.to_string() })),
            _ => {
                println!("{}", digest);
                Ok(())
            }
        }
    }
}

/// Read a `{"0xPKG::module::function": ["u64", ...]}` file.
pub fn load_signatures(path: &Path) -> Result<StaticSignatures> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a signature map", path.display()))?;

    let mut signatures = StaticSignatures::new();
    for (target, params) in raw {
        let mut parts = target.splitn(3, "::");
        let (Some(package), Some(module), Some(function)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(anyhow!(
                "invalid function '{}', expected 0xPKG::module::function",
                target
            ));
        };
        let package = SuiAddress::from_hex_literal(package)
            .with_context(|| format!("invalid package address in '{}'", target))?;
        signatures.insert(package, module, function, params);
    }
    Ok(signatures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_signatures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0x2::pay::split": ["&mut 0x2::coin::Coin<T0>", "u64"]}}"#).unwrap();
        let signatures = load_signatures(file.path()).unwrap();
        assert_eq!(signatures.len(), 1);
    }

    #[test]
    fn test_load_signatures_rejects_bad_target() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0x2::pay": []}}"#).unwrap();
        assert!(load_signatures(file.path()).is_err());
    }
}

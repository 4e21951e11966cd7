//! `type-tag`: parse, normalize and encode Move type tags.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use sui_txkit::bcs::{from_bytes, hex_encode, to_bytes};
use sui_txkit::types::{parse_type_tag, TypeTag};
use sui_txkit::{OutputFormat, TxkitConfig};

use super::output::{print_bytes, print_json};
use super::{read_bytes, read_input};

#[derive(Parser, Debug)]
pub struct TypeTagCmd {
    /// Type string such as `0x2::coin::Coin<0x2::sui::SUI>`, or BCS bytes with --from-bcs
    pub input: String,

    /// Treat the input as a BCS-encoded TypeTag (Base64 or 0x-hex)
    #[arg(long)]
    pub from_bcs: bool,
}

impl TypeTagCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let tag: TypeTag = if self.from_bcs {
            let bytes = read_bytes(&self.input, "type tag bytes")?;
            from_bytes(&bytes).context("failed to decode TypeTag")?
        } else {
            let text = read_input(&self.input)?;
            parse_type_tag(&text).with_context(|| format!("failed to parse '{}'", text))?
        };
        let bytes = to_bytes(&tag)?;

        match config.output {
            OutputFormat::Json => print_json(&json!({
                "type": tag.to_canonical_string(config.normalize_addresses),
                "short": tag.to_string(),
                "normalized": tag.to_canonical_string(true),
                "bcs": format!("0x{}", hex_encode(&bytes)),
            })),
            format => print_bytes(&bytes, format),
        }
    }
}

//! CLI subcommand implementations for sui-txkit

pub mod keys;
pub mod output;
pub mod pure;
pub mod tx;
pub mod type_tag;

use std::io::Read;

use anyhow::{Context, Result};
use sui_txkit::bcs::decode_text;

/// Raw command-line input: `-` reads stdin, anything else is used as is.
pub fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf.trim().to_string())
    } else {
        Ok(arg.trim().to_string())
    }
}

/// Bytes given as `0x`-hex or Base64 (or `-` for stdin).
pub fn read_bytes(arg: &str, what: &str) -> Result<Vec<u8>> {
    let text = read_input(arg)?;
    Ok(decode_text(&text, what)?)
}

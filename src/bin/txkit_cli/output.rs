//! Output formatting shared by the subcommands.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use sui_txkit::bcs::{base64_encode, hex_encode, BcsError};
use sui_txkit::types::CryptoError;
use sui_txkit::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render bytes in the requested format. JSON carries both text forms.
pub fn format_bytes(bytes: &[u8], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Hex => format!("0x{}", hex_encode(bytes)),
        OutputFormat::Base64 => base64_encode(bytes),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "hex": format!("0x{}", hex_encode(bytes)),
            "base64": base64_encode(bytes),
            "length": bytes.len(),
        }))?,
    })
}

pub fn print_bytes(bytes: &[u8], format: OutputFormat) -> Result<()> {
    println!("{}", format_bytes(bytes, format)?);
    Ok(())
}

/// Kind of the first codec error in the chain, e.g. `UnexpectedEof`.
pub fn error_kind(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(bcs) = cause.downcast_ref::<BcsError>() {
            return Some(bcs.kind());
        }
        match cause.downcast_ref::<CryptoError>() {
            Some(CryptoError::Bcs(bcs)) => Some(bcs.kind()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[1, 2], OutputFormat::Hex).unwrap(), "0x0102");
        assert_eq!(format_bytes(&[1, 2], OutputFormat::Base64).unwrap(), "AQI=");
        let json: serde_json::Value =
            serde_json::from_str(&format_bytes(&[1, 2], OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["length"], 2);
        assert_eq!(json["hex"], "0x0102");
    }

    #[test]
    fn test_error_kind_looks_through_context() {
        let err = Err::<(), _>(BcsError::Overflow { offset: 3 })
            .context("failed to decode TransactionData")
            .unwrap_err();
        assert_eq!(error_kind(&err), Some("Overflow"));

        let err = anyhow::Error::from(CryptoError::Bcs(BcsError::TrailingBytes { remaining: 1 }));
        assert_eq!(error_kind(&err), Some("TrailingBytes"));

        assert_eq!(error_kind(&anyhow!("no signing key")), None);
    }
}

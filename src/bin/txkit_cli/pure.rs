//! `encode-pure` and `decode-pure`.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use sui_txkit::bcs::{decode_pure_json, encode_pure_json};
use sui_txkit::TxkitConfig;

use super::output::print_bytes;
use super::{read_bytes, read_input};

#[derive(Parser, Debug)]
pub struct EncodePureCmd {
    /// Pure type: bool, u8..u256, address, string, vector<T>, option<T>
    pub type_name: String,

    /// JSON value; text that is not valid JSON is taken as a string
    pub value: String,
}

impl EncodePureCmd {
    pub fn execute(&self, config: &TxkitConfig) -> Result<()> {
        let text = read_input(&self.value)?;
        let json = parse_json_or_string(&text);
        let bytes = encode_pure_json(&self.type_name, &json)
            .with_context(|| format!("cannot encode {} as {}", text, self.type_name))?;
        print_bytes(&bytes, config.output)
    }
}

#[derive(Parser, Debug)]
pub struct DecodePureCmd {
    /// Pure type: bool, u8..u256, address, string, vector<T>, option<T>
    pub type_name: String,

    /// BCS bytes as Base64 or 0x-hex (`-` reads stdin)
    pub bytes: String,
}

impl DecodePureCmd {
    pub fn execute(&self, _config: &TxkitConfig) -> Result<()> {
        let bytes = read_bytes(&self.bytes, "pure bytes")?;
        let value = decode_pure_json(&self.type_name, &bytes)
            .with_context(|| format!("cannot decode bytes as {}", self.type_name))?;
        println!("{}", serde_json::to_string(&value)?);
        Ok(())
    }
}

/// `hello` is accepted as shorthand for `"hello"`.
fn parse_json_or_string(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_or_string() {
        assert_eq!(parse_json_or_string("12"), Value::from(12));
        assert_eq!(parse_json_or_string("\"12\""), Value::from("12"));
        assert_eq!(parse_json_or_string("hello"), Value::from("hello"));
        assert_eq!(parse_json_or_string("[1,2]"), serde_json::json!([1, 2]));
    }
}

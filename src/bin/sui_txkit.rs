//! sui-txkit: inspect, encode and sign Sui transactions offline
//!
//! ## Features
//!
//! - **decode-tx**: Decode BCS `TransactionData` to JSON, optionally typing pure inputs
//! - **digest**: Compute a transaction digest
//! - **encode-pure** / **decode-pure**: Convert pure argument values to and from BCS
//! - **type-tag**: Parse, normalize and BCS-encode Move type tags
//! - **keygen** / **address**: Generate Ed25519 keys and derive addresses
//! - **sign**: Sign transactions or personal messages under the proper intent
//!
//! ## Example Usage
//!
//! ```bash
//! # Decode a transaction
//! sui-txkit decode-tx AAACACBqEB6...
//!
//! # Encode a vector<u64> argument as hex
//! sui-txkit --output hex encode-pure 'vector<u64>' '[1, 2, 3]'
//!
//! # Print a type with full-width addresses
//! sui-txkit --normalize type-tag '0x2::coin::Coin<0x2::sui::SUI>'
//!
//! # Sign with the key in SUI_TXKIT_KEY
//! sui-txkit sign AAACACBqEB6...
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use sui_txkit::logging::init_logging;
use sui_txkit::{OutputFormat, TxkitConfig};
use tracing::debug;

mod txkit_cli;

use txkit_cli::{
    keys::{AddressCmd, KeygenCmd, SignCmd},
    output::error_kind,
    pure::{DecodePureCmd, EncodePureCmd},
    tx::{DecodeTxCmd, DigestCmd},
    type_tag::TypeTagCmd,
};

#[derive(Parser)]
#[command(
    name = "sui-txkit",
    author,
    version,
    about = "Offline Sui transaction toolkit",
    long_about = "Decode, encode and sign Sui transactions using the canonical BCS wire format.\n\n\
                  Byte inputs are accepted as Base64 or 0x-prefixed hex; `-` reads stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for byte results (default: SUI_TXKIT_OUTPUT or json)
    #[arg(long, short, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Print type tags with full 32-byte addresses
    #[arg(long, global = true)]
    normalize: bool,

    /// Log filter when RUST_LOG is unset (default: SUI_TXKIT_LOG or warn)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode BCS TransactionData to JSON
    DecodeTx(DecodeTxCmd),

    /// Compute the digest of BCS TransactionData
    Digest(DigestCmd),

    /// Encode a JSON value as a pure argument of the given type
    EncodePure(EncodePureCmd),

    /// Decode pure argument bytes of the given type to JSON
    DecodePure(DecodePureCmd),

    /// Parse and re-print a Move type tag
    TypeTag(TypeTagCmd),

    /// Generate a new Ed25519 key
    Keygen(KeygenCmd),

    /// Print the address of a key
    Address(AddressCmd),

    /// Sign a transaction or personal message
    Sign(SignCmd),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::DecodeTx(_) => "decode-tx",
            Commands::Digest(_) => "digest",
            Commands::EncodePure(_) => "encode-pure",
            Commands::DecodePure(_) => "decode-pure",
            Commands::TypeTag(_) => "type-tag",
            Commands::Keygen(_) => "keygen",
            Commands::Address(_) => "address",
            Commands::Sign(_) => "sign",
        }
    }
}

fn main() -> Result<()> {
    let Cli {
        command,
        output,
        normalize,
        log_level,
    } = Cli::parse();

    let config = TxkitConfig::from_env()?.with_overrides(output, normalize, log_level);
    init_logging(&config.log_level)?;
    let command_name = command.name();
    debug!(command = command_name, output = %config.output, "running command");

    let result = match command {
        Commands::DecodeTx(cmd) => cmd.execute(&config),
        Commands::Digest(cmd) => cmd.execute(&config),
        Commands::EncodePure(cmd) => cmd.execute(&config),
        Commands::DecodePure(cmd) => cmd.execute(&config),
        Commands::TypeTag(cmd) => cmd.execute(&config),
        Commands::Keygen(cmd) => cmd.execute(&config),
        Commands::Address(cmd) => cmd.execute(&config),
        Commands::Sign(cmd) => cmd.execute(&config),
    };

    if let Err(err) = &result {
        if let Some(kind) = error_kind(err) {
            eprintln!("{} failed: {}", command_name, kind);
        }
    }
    result
}

//! sui-txkit: canonical encoding, transaction building and signing for Sui clients.
//!
//! The work lives in the member crates, re-exported here:
//!
//! - [`bcs`] (`sui-txkit-bcs`): primitive codec, combinators, dynamic pure types, codec registry
//! - [`types`] (`sui-txkit-types`): type tags, the transaction graph, builder, effects, keys and signatures
//!
//! This crate adds the [`config`] and [`logging`] used by the `sui-txkit` binary.

pub mod config;
pub mod logging;

pub use sui_txkit_bcs as bcs;
pub use sui_txkit_types as types;

pub use config::{OutputFormat, TxkitConfig};

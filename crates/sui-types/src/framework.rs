//! Sui framework package addresses and the framework module/struct names the
//! builder and pure-type mapping refer to.
//!
//! # Example
//!
//! ```
//! use sui_txkit_types::framework::{MOVE_STDLIB, SUI_FRAMEWORK};
//!
//! assert_eq!(MOVE_STDLIB.to_short_string(), "0x1");
//! assert_eq!(SUI_FRAMEWORK.to_short_string(), "0x2");
//! ```

use crate::address::SuiAddress;

/// Move standard library address (0x1)
pub const MOVE_STDLIB: SuiAddress = SuiAddress::from_u16(1);

/// Sui framework address (0x2)
pub const SUI_FRAMEWORK: SuiAddress = SuiAddress::from_u16(2);

// ============================================================================
// Module and struct names
// ============================================================================

pub const STD_STRING_MODULE: &str = "string";
pub const STD_ASCII_MODULE: &str = "ascii";
pub const STD_OPTION_MODULE: &str = "option";
pub const STRING_STRUCT: &str = "String";
pub const OPTION_STRUCT: &str = "Option";

pub const OBJECT_MODULE: &str = "object";
pub const ID_STRUCT: &str = "ID";
pub const TX_CONTEXT_MODULE: &str = "tx_context";
pub const TX_CONTEXT_STRUCT: &str = "TxContext";

/// `0x2::package`, home of `authorize_upgrade`.
pub const PACKAGE_MODULE: &str = "package";

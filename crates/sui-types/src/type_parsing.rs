//! Type string parsing.
//!
//! Grammar accepted by [`parse_type_tag`]:
//! - Primitive keywords: `bool`, `u8`, `u16`, `u32`, `u64`, `u128`, `u256`, `address`, `signer`
//! - Vector types: `vector<T>`
//! - Struct types: `0x2::module::Struct` or `0x2::module::Struct<T1, T2>`
//!
//! Generic argument lists are split on top-level commas only, so nested generics
//! stay intact. Nesting is capped at [`MAX_TYPE_DEPTH`] levels. Every failure is a
//! [`BcsError::ParseError`] naming the offending token.

use sui_txkit_bcs::{BcsError, BcsResult, MAX_TYPE_DEPTH};

use crate::address::SuiAddress;
use crate::type_tag::{StructTag, TypeTag};

/// Parse a Move type string into a TypeTag.
///
/// # Examples
///
/// ```
/// use sui_txkit_types::type_parsing::parse_type_tag;
///
/// let tag = parse_type_tag("0x2::coin::Coin<0x2::sui::SUI>").unwrap();
/// assert_eq!(tag.to_string(), "0x2::coin::Coin<0x2::sui::SUI>");
/// ```
pub fn parse_type_tag(type_str: &str) -> BcsResult<TypeTag> {
    parse_type_tag_at(type_str, 0)
}

/// Parse `address::module::Name<T1, ..., Tn>`.
pub fn parse_struct_tag(type_str: &str) -> BcsResult<StructTag> {
    parse_struct_tag_at(type_str, 0)
}

fn nest(depth: usize) -> BcsResult<usize> {
    if depth >= MAX_TYPE_DEPTH {
        return Err(BcsError::parse(format!(
            "type nests deeper than {} levels",
            MAX_TYPE_DEPTH
        )));
    }
    Ok(depth + 1)
}

fn parse_type_tag_at(type_str: &str, depth: usize) -> BcsResult<TypeTag> {
    let type_str = type_str.trim();

    match type_str {
        "" => return Err(BcsError::parse("empty type string")),
        "bool" => return Ok(TypeTag::Bool),
        "u8" => return Ok(TypeTag::U8),
        "u16" => return Ok(TypeTag::U16),
        "u32" => return Ok(TypeTag::U32),
        "u64" => return Ok(TypeTag::U64),
        "u128" => return Ok(TypeTag::U128),
        "u256" => return Ok(TypeTag::U256),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }

    if let Some(rest) = type_str.strip_prefix("vector<") {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| BcsError::parse(format!("unterminated vector type '{}'", type_str)))?;
        if inner.trim().is_empty() {
            return Err(BcsError::parse(format!("vector type '{}' has no element type", type_str)));
        }
        let depth = nest(depth)?;
        check_balanced(inner)?;
        return Ok(TypeTag::Vector(Box::new(parse_type_tag_at(inner, depth)?)));
    }

    if !type_str.contains("::") {
        return Err(BcsError::parse(format!("unknown type '{}'", type_str)));
    }

    parse_struct_tag_at(type_str, depth).map(|s| TypeTag::Struct(Box::new(s)))
}

fn parse_struct_tag_at(type_str: &str, depth: usize) -> BcsResult<StructTag> {
    let type_str = type_str.trim();

    let (base_type, type_args_str) = match type_str.find('<') {
        Some(angle_pos) => (&type_str[..angle_pos], Some(&type_str[angle_pos..])),
        None => (type_str, None),
    };

    let mut parts = base_type.splitn(3, "::");
    let (address_str, module_name, struct_name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(m), Some(n)) => (a.trim(), m.trim(), n.trim()),
        _ => {
            return Err(BcsError::parse(format!(
                "struct type '{}' must look like address::module::Name",
                type_str
            )))
        }
    };

    let address = SuiAddress::from_hex_literal(address_str)
        .map_err(|_| BcsError::parse(format!("invalid address '{}' in '{}'", address_str, type_str)))?;
    for ident in [module_name, struct_name] {
        if !is_valid_identifier(ident) {
            return Err(BcsError::parse(format!(
                "invalid identifier '{}' in '{}'",
                ident, type_str
            )));
        }
    }

    let type_params = match type_args_str {
        Some(args_str) => parse_type_args(args_str, type_str, nest(depth)?)?,
        None => vec![],
    };

    Ok(StructTag {
        address,
        module: module_name.to_string(),
        name: struct_name.to_string(),
        type_params,
    })
}

/// Parse a type-argument list like "<T1, T2, T3>".
fn parse_type_args(args_str: &str, whole: &str, depth: usize) -> BcsResult<Vec<TypeTag>> {
    let inner = args_str
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| BcsError::parse(format!("unterminated type arguments in '{}'", whole)))?;
    check_balanced(inner)?;
    if inner.trim().is_empty() {
        return Err(BcsError::parse(format!("empty type argument list in '{}'", whole)));
    }

    split_type_params(inner)
        .into_iter()
        .map(|arg| {
            if arg.is_empty() {
                Err(BcsError::parse(format!("empty type argument in '{}'", whole)))
            } else {
                parse_type_tag_at(arg, depth)
            }
        })
        .collect()
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
/// A trailing empty segment ("A,") is kept so callers can reject it.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    result.push(s[start..].trim());
    result
}

fn check_balanced(s: &str) -> BcsResult<()> {
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return Err(BcsError::parse(format!("unbalanced '>' in '{}'", s)));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(BcsError::parse(format!("unbalanced '<' in '{}'", s)));
    }
    Ok(())
}

/// Move identifiers: `[A-Za-z_][A-Za-z0-9_]*`, and `_` alone is not allowed.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let valid_start = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('_') => s.len() > 1,
        _ => false,
    };
    valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

//! Recover the logical types of pure inputs.
//!
//! A decoded transaction carries its pure inputs as opaque bytes. The types are
//! implied by where each input is used: Move call parameters (looked up through a
//! [`FunctionSignatureSource`]), `SplitCoins` amounts (`u64`) and the
//! `TransferObjects` recipient (`address`). [`resolve_pure_inputs`] walks the
//! commands, maps each use site into the pure grammar, decodes the bytes to make
//! sure they fit and returns the transaction with the types attached.

use std::collections::HashMap;

use sui_txkit_bcs::{decode_with, BcsError, BcsResult, PureType};
use tracing::{debug, warn};

use crate::address::ObjectID;
use crate::framework::{
    ID_STRUCT, MOVE_STDLIB, OBJECT_MODULE, OPTION_STRUCT, STD_ASCII_MODULE, STD_OPTION_MODULE,
    STD_STRING_MODULE, STRING_STRUCT, SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_STRUCT,
};
use crate::transaction::{
    Argument, CallArg, Command, ProgrammableTransaction, TransactionData, TransactionKind,
};
use crate::type_parsing::parse_type_tag;
use crate::type_tag::TypeTag;

/// Supplies Move function parameter types, typically from a node's
/// normalized-module RPC.
pub trait FunctionSignatureSource {
    /// Parameter types of `package::module::function`, in declaration order.
    ///
    /// Types are Move type strings: `u64`, `&mut 0x2::coin::Coin<T0>`,
    /// `vector<0x1::string::String>`. Generic parameters are written `T0`, `T1`, ...
    fn parameter_types(
        &self,
        package: &ObjectID,
        module: &str,
        function: &str,
    ) -> BcsResult<Vec<String>>;
}

/// In-memory signature table.
#[derive(Debug, Clone, Default)]
pub struct StaticSignatures {
    functions: HashMap<(ObjectID, String, String), Vec<String>>,
}

impl StaticSignatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, package: ObjectID, module: &str, function: &str, params: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.insert(
            (package, module.to_string(), function.to_string()),
            params.into_iter().map(Into::into).collect(),
        );
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionSignatureSource for StaticSignatures {
    fn parameter_types(
        &self,
        package: &ObjectID,
        module: &str,
        function: &str,
    ) -> BcsResult<Vec<String>> {
        self.functions
            .get(&(*package, module.to_string(), function.to_string()))
            .cloned()
            .ok_or_else(|| {
                BcsError::UnknownType(format!(
                    "{}::{}::{}",
                    package.to_short_string(),
                    module,
                    function
                ))
            })
    }
}

// ============================================================================
// Move type -> pure type
// ============================================================================

/// Map a Move type onto the pure grammar, or `None` if values of that type are
/// passed as objects.
pub fn pure_type_for_move_type(tag: &TypeTag) -> Option<PureType> {
    match tag {
        TypeTag::Bool => Some(PureType::Bool),
        TypeTag::U8 => Some(PureType::U8),
        TypeTag::U16 => Some(PureType::U16),
        TypeTag::U32 => Some(PureType::U32),
        TypeTag::U64 => Some(PureType::U64),
        TypeTag::U128 => Some(PureType::U128),
        TypeTag::U256 => Some(PureType::U256),
        TypeTag::Address => Some(PureType::Address),
        TypeTag::Signer => None,
        TypeTag::Vector(inner) => {
            pure_type_for_move_type(inner).map(|inner| PureType::Vector(Box::new(inner)))
        }
        TypeTag::Struct(s) => {
            if s.is(&MOVE_STDLIB, STD_STRING_MODULE, STRING_STRUCT)
                || s.is(&MOVE_STDLIB, STD_ASCII_MODULE, STRING_STRUCT)
            {
                Some(PureType::String)
            } else if s.is(&SUI_FRAMEWORK, OBJECT_MODULE, ID_STRUCT) {
                Some(PureType::Address)
            } else if s.is(&MOVE_STDLIB, STD_OPTION_MODULE, OPTION_STRUCT) {
                let [inner] = s.type_params.as_slice() else {
                    return None;
                };
                pure_type_for_move_type(inner).map(|inner| PureType::Option(Box::new(inner)))
            } else {
                None
            }
        }
    }
}

fn is_tx_context(tag: &TypeTag) -> bool {
    tag.as_struct()
        .is_some_and(|s| s.is(&SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_STRUCT))
}

fn strip_reference(param: &str) -> &str {
    let param = param.trim();
    if let Some(rest) = param.strip_prefix("&mut ") {
        rest.trim_start()
    } else if let Some(rest) = param.strip_prefix('&') {
        rest.trim_start()
    } else {
        param
    }
}

/// Replace generic parameter tokens (`T0`, `T1`, ...) with the call's type arguments.
fn substitute_type_params(param: &str, type_args: &[TypeTag]) -> BcsResult<String> {
    let mut out = String::with_capacity(param.len());
    let mut token = String::new();
    let mut prev = None;

    let flush = |token: &mut String, prev: Option<char>, out: &mut String| -> BcsResult<()> {
        if token.is_empty() {
            return Ok(());
        }
        let is_param = prev != Some(':')
            && token.len() > 1
            && token.starts_with('T')
            && token[1..].chars().all(|c| c.is_ascii_digit());
        if is_param {
            let index: usize = token[1..]
                .parse()
                .map_err(|_| BcsError::parse(format!("bad type parameter '{}'", token)))?;
            let arg = type_args.get(index).ok_or_else(|| {
                BcsError::invalid(format!(
                    "type parameter {} out of range, call has {} type arguments",
                    token,
                    type_args.len()
                ))
            })?;
            out.push_str(&arg.to_canonical_string(false));
        } else {
            out.push_str(token);
        }
        token.clear();
        Ok(())
    };

    for c in param.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            token.push(c);
        } else {
            flush(&mut token, prev, &mut out)?;
            out.push(c);
            prev = Some(c);
        }
    }
    flush(&mut token, prev, &mut out)?;
    Ok(out)
}

/// Parse one Move parameter type, stripping references and substituting generics.
pub fn parse_parameter_type(param: &str, type_args: &[TypeTag]) -> BcsResult<TypeTag> {
    let stripped = strip_reference(param);
    parse_type_tag(&substitute_type_params(stripped, type_args)?)
}

// ============================================================================
// Resolution
// ============================================================================

struct Assignments<'a> {
    inputs: &'a [CallArg],
    types: HashMap<u16, PureType>,
}

impl Assignments<'_> {
    /// Record that `arg` is used as `ty`. Non-input arguments and object inputs are ignored.
    fn assign(&mut self, arg: &Argument, ty: &PureType, site: &str) -> BcsResult<()> {
        let Argument::Input(index) = arg else {
            return Ok(());
        };
        let input = self.inputs.get(usize::from(*index)).ok_or_else(|| {
            BcsError::invalid(format!("{} references missing input {}", site, index))
        })?;
        let CallArg::Pure(pure) = input else {
            return Ok(());
        };

        let existing = self
            .types
            .get(index)
            .or(pure.declared_type())
            .cloned();
        match existing {
            Some(prev) if prev != *ty => Err(BcsError::invalid(format!(
                "input {} is used as both {} and {} ({})",
                index, prev, ty, site
            ))),
            _ => {
                self.types.insert(*index, ty.clone());
                Ok(())
            }
        }
    }

    fn reject_pure(&self, arg: &Argument, param: &str, site: &str) -> BcsResult<()> {
        if let Argument::Input(index) = arg {
            if let Some(CallArg::Pure(_)) = self.inputs.get(usize::from(*index)) {
                return Err(BcsError::invalid(format!(
                    "{}: pure input {} passed for object parameter {}",
                    site, index, param
                )));
            }
        }
        Ok(())
    }
}

fn slot_index(index: usize) -> BcsResult<u16> {
    u16::try_from(index).map_err(|_| BcsError::range(format!("input index {} exceeds u16", index)))
}

/// Attach declared types to every pure input whose use site determines one.
///
/// Fails if an input is used at two different types, if a Move call's argument
/// count does not match its signature, or if the bytes do not decode as the
/// resolved type. Pure inputs with no typed use are left as they are.
pub fn resolve_pure_inputs(
    pt: &ProgrammableTransaction,
    source: &dyn FunctionSignatureSource,
) -> BcsResult<ProgrammableTransaction> {
    let mut assignments = Assignments {
        inputs: &pt.inputs,
        types: HashMap::new(),
    };

    for (cmd_index, command) in pt.commands.iter().enumerate() {
        match command {
            Command::MoveCall(call) => {
                let site = format!(
                    "command {} ({}::{}::{})",
                    cmd_index,
                    call.package.to_short_string(),
                    call.module,
                    call.function
                );
                let mut params = Vec::new();
                for raw in source.parameter_types(&call.package, &call.module, &call.function)? {
                    let tag = parse_parameter_type(&raw, &call.type_arguments)?;
                    if !is_tx_context(&tag) {
                        params.push((raw, tag));
                    }
                }
                if params.len() != call.arguments.len() {
                    return Err(BcsError::invalid(format!(
                        "{} takes {} arguments, {} given",
                        site,
                        params.len(),
                        call.arguments.len()
                    )));
                }
                for (arg, (raw, tag)) in call.arguments.iter().zip(&params) {
                    match pure_type_for_move_type(tag) {
                        Some(ty) => assignments.assign(arg, &ty, &site)?,
                        None => assignments.reject_pure(arg, raw, &site)?,
                    }
                }
            }
            Command::SplitCoins(_, amounts) => {
                let site = format!("command {} (SplitCoins)", cmd_index);
                for amount in amounts {
                    assignments.assign(amount, &PureType::U64, &site)?;
                }
            }
            Command::TransferObjects(_, recipient) => {
                let site = format!("command {} (TransferObjects)", cmd_index);
                assignments.assign(recipient, &PureType::Address, &site)?;
            }
            Command::MakeMoveVec(Some(elem), elems) => {
                if let Some(ty) = pure_type_for_move_type(elem) {
                    let site = format!("command {} (MakeMoveVec)", cmd_index);
                    for e in elems {
                        assignments.assign(e, &ty, &site)?;
                    }
                }
            }
            _ => {}
        }
    }

    let mut types = assignments.types;
    let mut inputs = Vec::with_capacity(pt.inputs.len());
    for (index, input) in pt.inputs.iter().enumerate() {
        let resolved = match input {
            CallArg::Pure(pure) => match types.remove(&slot_index(index)?) {
                Some(ty) => {
                    decode_with(pure.bytes(), |r| ty.decode(r)).map_err(|e| {
                        BcsError::invalid(format!(
                            "input {} does not decode as {}: {}",
                            index, ty, e
                        ))
                    })?;
                    debug!(input = index, pure_type = %ty, "resolved pure input");
                    CallArg::Pure(pure.clone().with_declared_type(ty))
                }
                None => {
                    if pure.declared_type().is_none() {
                        warn!(input = index, "pure input has no typed use, left unresolved");
                    }
                    input.clone()
                }
            },
            CallArg::Object(_) => input.clone(),
        };
        inputs.push(resolved);
    }

    Ok(ProgrammableTransaction {
        inputs,
        commands: pt.commands.clone(),
    })
}

/// [`resolve_pure_inputs`] over a whole transaction. Non-programmable kinds are
/// returned unchanged.
pub fn resolve_transaction_data(
    data: &TransactionData,
    source: &dyn FunctionSignatureSource,
) -> BcsResult<TransactionData> {
    let TransactionKind::ProgrammableTransaction(pt) = data.kind() else {
        return Ok(data.clone());
    };
    let resolved = resolve_pure_inputs(pt, source)?;
    let mut out = data.clone();
    match &mut out {
        TransactionData::V1(v1) => v1.kind = TransactionKind::ProgrammableTransaction(resolved),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SuiAddress;
    use crate::builder::ProgrammableTransactionBuilder;
    use crate::digests::ObjectDigest;
    use crate::object::ObjectRef;
    use crate::transaction::ObjectArg;
    use sui_txkit_bcs::PureValue;

    fn sui_type() -> TypeTag {
        parse_type_tag("0x2::sui::SUI").unwrap()
    }

    fn pkg() -> ObjectID {
        SuiAddress::from_u16(0xabc)
    }

    fn coin_ref() -> ObjectRef {
        ObjectRef::new(SuiAddress::from_u16(0x77), 9, ObjectDigest::new([1; 32]))
    }

    fn signatures() -> StaticSignatures {
        let mut sigs = StaticSignatures::new();
        sigs.insert(
            pkg(),
            "shop",
            "buy",
            [
                "&mut 0x2::coin::Coin<T0>",
                "u64",
                "0x1::string::String",
                "0x1::option::Option<0x2::object::ID>",
                "vector<T1>",
                "&mut 0x2::tx_context::TxContext",
            ],
        );
        sigs
    }

    #[test]
    fn test_pure_type_mapping() {
        let cases = [
            ("u8", Some("u8")),
            ("address", Some("address")),
            ("0x1::ascii::String", Some("string")),
            ("0x2::object::ID", Some("address")),
            ("vector<0x1::option::Option<u16>>", Some("vector<option<u16>>")),
            ("0x2::coin::Coin<0x2::sui::SUI>", None),
            ("vector<0x2::object::UID>", None),
            ("signer", None),
        ];
        for (move_type, expected) in cases {
            let tag = parse_type_tag(move_type).unwrap();
            let expected = expected.map(|s| PureType::parse(s).unwrap());
            assert_eq!(pure_type_for_move_type(&tag), expected, "{}", move_type);
        }
    }

    #[test]
    fn test_parse_parameter_type() {
        let args = vec![sui_type(), TypeTag::U8];
        assert_eq!(
            parse_parameter_type("&mut 0x2::coin::Coin<T0>", &args).unwrap(),
            parse_type_tag("0x2::coin::Coin<0x2::sui::SUI>").unwrap()
        );
        assert_eq!(
            parse_parameter_type("vector<T1>", &args).unwrap(),
            TypeTag::vector(TypeTag::U8)
        );
        assert_eq!(parse_parameter_type("& u64", &[]).unwrap(), TypeTag::U64);
        assert!(parse_parameter_type("T2", &args).is_err());
    }

    #[test]
    fn test_resolve_move_call_inputs() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        let coin = ptb.obj(ObjectArg::ImmOrOwnedObject(coin_ref())).unwrap();
        let amount = ptb.pure(&500u64).unwrap();
        let name = ptb.pure(&"hat".to_string()).unwrap();
        let maybe_id = ptb.pure(&Some(SuiAddress::from_u16(4))).unwrap();
        let bytes = ptb.pure(&vec![1u8, 2, 3]).unwrap();
        ptb.programmable_move_call(
            pkg(),
            "shop",
            "buy",
            vec![sui_type(), TypeTag::U8],
            vec![coin, amount, name, maybe_id, bytes],
        )
        .unwrap();
        let pt = ptb.finish();

        let resolved = resolve_pure_inputs(&pt, &signatures()).unwrap();
        assert_eq!(resolved, pt);
        let declared: Vec<Option<String>> = resolved
            .inputs
            .iter()
            .map(|i| i.as_pure().and_then(|p| p.declared_type()).map(|t| t.to_string()))
            .collect();
        assert_eq!(
            declared,
            vec![
                None,
                Some("u64".to_string()),
                Some("string".to_string()),
                Some("option<address>".to_string()),
                Some("vector<u8>".to_string()),
            ]
        );
        assert_eq!(
            resolved.pure_input(2).unwrap().value().unwrap(),
            PureValue::String("hat".to_string())
        );
    }

    #[test]
    fn test_resolve_builtin_commands() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        ptb.pay_sui(vec![SuiAddress::from_u16(1)], vec![10]).unwrap();
        let pt = ptb.finish();
        let resolved = resolve_pure_inputs(&pt, &StaticSignatures::new()).unwrap();
        let types: Vec<String> = resolved
            .inputs
            .iter()
            .filter_map(|i| i.as_pure()?.declared_type().map(|t| t.to_string()))
            .collect();
        assert_eq!(types, vec!["u64", "address"]);
    }

    #[test]
    fn test_conflicting_uses_fail() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        let shared = ptb.pure(&SuiAddress::from_u16(9)).unwrap();
        let split = ptb.command(Command::SplitCoins(Argument::GasCoin, vec![shared])).unwrap();
        ptb.command(Command::TransferObjects(vec![split], shared)).unwrap();
        let err = resolve_pure_inputs(&ptb.finish(), &StaticSignatures::new()).unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        let amount = ptb.pure(&1u64).unwrap();
        ptb.programmable_move_call(pkg(), "shop", "buy", vec![], vec![amount])
            .unwrap();
        let err = resolve_pure_inputs(&ptb.finish(), &signatures()).unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    #[test]
    fn test_bytes_must_decode_as_resolved_type() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        // four bytes where a u64 is expected
        let amount = ptb.pure_bytes(vec![1, 0, 0, 0]).unwrap();
        ptb.command(Command::SplitCoins(Argument::GasCoin, vec![amount])).unwrap();
        let err = resolve_pure_inputs(&ptb.finish(), &StaticSignatures::new()).unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    #[test]
    fn test_pure_for_object_parameter_fails() {
        let mut sigs = StaticSignatures::new();
        sigs.insert(pkg(), "m", "f", ["&0x2::coin::Coin<0x2::sui::SUI>"]);
        let mut ptb = ProgrammableTransactionBuilder::new();
        let bogus = ptb.pure(&3u64).unwrap();
        ptb.programmable_move_call(pkg(), "m", "f", vec![], vec![bogus])
            .unwrap();
        assert!(resolve_pure_inputs(&ptb.finish(), &sigs).is_err());
    }

    #[test]
    fn test_unknown_function() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        ptb.programmable_move_call(pkg(), "nope", "f", vec![], vec![])
            .unwrap();
        let err = resolve_pure_inputs(&ptb.finish(), &signatures()).unwrap_err();
        assert!(matches!(err, BcsError::UnknownType(_)));
    }

    #[test]
    fn test_resolve_transaction_data() {
        let mut ptb = ProgrammableTransactionBuilder::new();
        ptb.transfer_sui(SuiAddress::from_u16(5), Some(100)).unwrap();
        let data = TransactionData::new_programmable(
            SuiAddress::from_u16(1),
            vec![coin_ref()],
            ptb.finish(),
            1_000_000,
            750,
        );
        let resolved = resolve_transaction_data(&data, &StaticSignatures::new()).unwrap();
        assert_eq!(resolved.to_bytes().unwrap(), data.to_bytes().unwrap());
        let pt = resolved.kind().as_programmable().unwrap();
        assert!(pt.inputs.iter().all(|i| i.as_pure().unwrap().declared_type().is_some()));
    }
}

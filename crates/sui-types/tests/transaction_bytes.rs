//! End-to-end checks on full transactions: exact wire bytes, digests, signing
//! and name-based access through the global registry.

use sui_txkit_bcs::{from_bytes, to_bytes, BcsError};
use sui_txkit_types::crypto::SuiKeyPair;
use sui_txkit_types::digests::blake2b256;
use sui_txkit_types::{
    global_registry, Argument, CallArg, Command, ObjectDigest, ObjectRef,
    ProgrammableTransactionBuilder, SignedTransaction, SuiAddress, TransactionData,
    TransactionDigest,
};

const SENDER: SuiAddress = SuiAddress::new([0x11; 32]);
const RECIPIENT: SuiAddress = SuiAddress::new([0x22; 32]);
const GAS_COIN: SuiAddress = SuiAddress::new([0x33; 32]);

fn gas_ref() -> ObjectRef {
    ObjectRef::new(GAS_COIN, 7, ObjectDigest::new([0x44; 32]))
}

fn transfer_tx() -> TransactionData {
    let mut ptb = ProgrammableTransactionBuilder::new();
    ptb.transfer_sui(RECIPIENT, Some(1_000)).unwrap();
    TransactionData::new_programmable(SENDER, vec![gas_ref()], ptb.finish(), 10_000_000, 1_000)
}

fn expected_transfer_bytes() -> Vec<u8> {
    let mut b = vec![
        0x00, // TransactionData::V1
        0x00, // TransactionKind::ProgrammableTransaction
        0x02, // two inputs
        0x00, 0x20, // Pure, 32 bytes: recipient
    ];
    b.extend_from_slice(&[0x22; 32]);
    b.extend_from_slice(&[0x00, 0x08]); // Pure, 8 bytes: amount
    b.extend_from_slice(&1_000u64.to_le_bytes());
    b.push(0x02); // two commands
    // SplitCoins(GasCoin, [Input(1)])
    b.extend_from_slice(&[0x02, 0x00, 0x01, 0x01, 0x01, 0x00]);
    // TransferObjects([Result(0)], Input(0))
    b.extend_from_slice(&[0x01, 0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0x00]);
    b.extend_from_slice(&[0x11; 32]); // sender
    b.push(0x01); // one gas coin
    b.extend_from_slice(&[0x33; 32]);
    b.extend_from_slice(&7u64.to_le_bytes());
    b.push(0x20);
    b.extend_from_slice(&[0x44; 32]);
    b.extend_from_slice(&[0x11; 32]); // gas owner
    b.extend_from_slice(&1_000u64.to_le_bytes()); // price
    b.extend_from_slice(&10_000_000u64.to_le_bytes()); // budget
    b.push(0x00); // TransactionExpiration::None
    b
}

#[test]
fn test_transfer_sui_exact_bytes() {
    let tx = transfer_tx();
    let bytes = tx.to_bytes().unwrap();
    assert_eq!(bytes, expected_transfer_bytes());
    assert_eq!(TransactionData::from_bytes(&bytes).unwrap(), tx);
    assert_eq!(TransactionData::from_base64(&tx.to_base64().unwrap()).unwrap(), tx);
}

#[test]
fn test_transaction_digest() {
    let tx = transfer_tx();
    let mut preimage = b"TransactionData::".to_vec();
    preimage.extend_from_slice(&expected_transfer_bytes());
    assert_eq!(tx.digest().unwrap(), TransactionDigest::new(blake2b256(&preimage)));
}

#[test]
fn test_truncated_transaction_fails() {
    let bytes = expected_transfer_bytes();
    for cut in [1, 10, bytes.len() / 2, bytes.len() - 1] {
        let err = TransactionData::from_bytes(&bytes[..cut]).unwrap_err();
        assert!(
            matches!(err, BcsError::UnexpectedEof { .. }),
            "cut at {} gave {:?}",
            cut,
            err
        );
    }
    let mut long = bytes.clone();
    long.push(0);
    assert_eq!(
        TransactionData::from_bytes(&long).unwrap_err(),
        BcsError::TrailingBytes { remaining: 1 }
    );
}

#[test]
fn test_signed_bytes_are_intent_prefixed() {
    let key = SuiKeyPair::from_secret_bytes(&[5u8; 32]).unwrap();
    let mut ptb = ProgrammableTransactionBuilder::new();
    ptb.transfer_sui(RECIPIENT, None).unwrap();
    let tx = TransactionData::new_programmable(
        key.address(),
        vec![gas_ref()],
        ptb.finish(),
        2_000_000,
        750,
    );

    let signed = SignedTransaction::sign(tx.clone(), &key).unwrap();
    let envelope = to_bytes(&signed.intent_message).unwrap();
    let raw = tx.to_bytes().unwrap();
    assert_eq!(envelope.len(), raw.len() + 3);
    assert_eq!(&envelope[..3], &[0, 0, 0]);
    assert_eq!(&envelope[3..], raw.as_slice());

    signed.tx_signatures[0].verify_raw(&blake2b256(&envelope)).unwrap();
    assert!(signed.tx_signatures[0].verify_raw(&blake2b256(&raw)).is_err());
    signed.verify().unwrap();

    let (tx_b64, sigs) = signed.to_execute_params().unwrap();
    assert_eq!(tx_b64, tx.to_base64().unwrap());
    assert_eq!(sigs, vec![signed.tx_signatures[0].to_base64()]);
}

#[test]
fn test_builder_dedups_identical_inputs() {
    let mut ptb = ProgrammableTransactionBuilder::new();
    let a = ptb.pure(&42u64).unwrap();
    let b = ptb.pure(&42u64).unwrap();
    let c = ptb.pure(&43u64).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    ptb.command(Command::SplitCoins(Argument::GasCoin, vec![a, b, c]))
        .unwrap();
    let pt = ptb.finish();
    assert_eq!(pt.inputs.len(), 2);
    assert_eq!(pt.inputs[0], CallArg::pure(&42u64).unwrap());
}

#[test]
fn test_global_registry_round_trip() {
    let registry = global_registry();
    let tx = transfer_tx();
    let b64 = registry.to_base64("TransactionData", &tx).unwrap();
    assert_eq!(b64, tx.to_base64().unwrap());
    let back = registry
        .from_base64("TransactionData", &b64)
        .unwrap()
        .downcast::<TransactionData>()
        .unwrap();
    assert_eq!(*back, tx);

    let refs = vec![gas_ref(), gas_ref()];
    let bytes = registry.to_bytes("vector<ObjectRef>", &refs).unwrap();
    assert_eq!(bytes.len(), 1 + 2 * 73);
    assert_eq!(from_bytes::<Vec<ObjectRef>>(&bytes).unwrap(), refs);
}

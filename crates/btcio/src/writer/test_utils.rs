//! Fixtures shared by the writer tests.

use std::str::FromStr;

use bitcoin::{
    key::{CompressedPublicKey, Keypair},
    secp256k1::SecretKey,
    Address, Amount, Network, OutPoint, Transaction, TxOut, Txid,
};
use secp256k1::SECP256K1;

use super::{
    commit::CommitSession,
    reveal::{build_unsigned_reveal, commit_prevout},
};
use crate::payload::Payload;

/// Deterministic key pair derived from a one-byte seed. `seed` must be non-zero.
pub(crate) fn test_keypair(seed: u8) -> Keypair {
    let sk = SecretKey::from_slice(&[seed; 32]).expect("valid secret key");
    Keypair::from_secret_key(SECP256K1, &sk)
}

/// Memo of `len` bytes with a recognizable byte pattern.
pub(crate) fn test_payload(len: usize) -> Payload {
    Payload::new((0..len).map(|i| (i % 251) as u8).collect()).expect("payload long enough")
}

pub(crate) fn test_outpoint() -> OutPoint {
    OutPoint {
        txid: Txid::from_str("4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b")
            .expect("valid txid"),
        vout: 1,
    }
}

/// Regtest key-path taproot address.
pub(crate) fn p2tr_destination(seed: u8) -> Address {
    let (key, _) = test_keypair(seed).x_only_public_key();
    Address::p2tr(SECP256K1, key, None, Network::Regtest)
}

/// Regtest segwit v0 key hash address.
pub(crate) fn p2wpkh_destination(seed: u8) -> Address {
    let pk = CompressedPublicKey(test_keypair(seed).public_key());
    Address::p2wpkh(&pk, Network::Regtest)
}

/// Unsigned reveal skeleton spending [`test_outpoint`] plus the prevout it spends.
pub(crate) fn unsigned_reveal(session: &CommitSession, amount: Amount) -> (Transaction, TxOut) {
    (
        build_unsigned_reveal(test_outpoint()),
        commit_prevout(session, amount),
    )
}

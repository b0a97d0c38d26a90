use bitcoin::{Amount, Script, Transaction, TxOut};

use super::{errors::CommitRevealError, signer::RevealSigner};

/// Computes the fee a reveal transaction has to pay at `fee_rate` sat/vB.
///
/// A copy of `partial_tx` gets a temporary output of `amount` to `destination` and is signed
/// with the real key, so the measured virtual size matches the final transaction exactly.
/// Output values are fixed-width, so the result does not depend on `amount`. `partial_tx` is
/// left untouched.
pub fn estimate_reveal_fee(
    partial_tx: &Transaction,
    prevout: &TxOut,
    destination: &Script,
    amount: Amount,
    fee_rate: u64,
    signer: &RevealSigner<'_>,
) -> Result<Amount, CommitRevealError> {
    let mut tx = partial_tx.clone();
    tx.output.push(TxOut {
        value: amount,
        script_pubkey: destination.to_owned(),
    });
    signer.sign(&mut tx, prevout)?;

    let vsize = tx.vsize() as u64;
    let fee = vsize
        .checked_mul(fee_rate)
        .ok_or(CommitRevealError::FeeOverflow { vsize, fee_rate })?;

    Ok(Amount::from_sat(fee))
}

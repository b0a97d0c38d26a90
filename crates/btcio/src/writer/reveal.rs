use bitcoin::{
    absolute::LockTime,
    address::NetworkUnchecked,
    consensus::encode::{serialize, serialize_hex},
    transaction::Version,
    Address, Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Weight,
    Witness,
};
use tracing::*;

use super::{
    commit::CommitSession, errors::CommitRevealError, fee::estimate_reveal_fee,
    signer::RevealSigner,
};

/// Heaviest transaction standard relay policy accepts.
pub const MAX_STANDARD_TX_WEIGHT: Weight = Weight::from_wu(400_000);

/// Caller-supplied inputs for a reveal.
///
/// The outpoint and amount are trusted as given. Nothing checks that the commit output exists
/// or holds `commit_amount`, a wrong value only produces an invalid signature.
#[derive(Debug, Clone)]
pub struct RevealParams {
    /// Where the revealed funds go. Must belong to the session's network.
    pub destination: Address<NetworkUnchecked>,

    /// Output of the funding transaction paying to the commit address.
    pub commit_outpoint: OutPoint,

    /// Value held by `commit_outpoint`.
    pub commit_amount: Amount,

    /// Fee rate in sat/vB.
    pub fee_rate: u64,
}

/// A signed reveal transaction, ready for broadcast.
#[derive(Debug, Clone)]
pub struct RevealTx {
    tx: Transaction,
    fee: Amount,
}

impl RevealTx {
    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_tx(self) -> Transaction {
        self.tx
    }

    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    /// Fee paid, equal to the commit amount minus the output value.
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// Value paid to the destination.
    pub fn value(&self) -> Amount {
        self.tx
            .output
            .first()
            .map(|out| out.value)
            .unwrap_or(Amount::ZERO)
    }

    /// Consensus-encoded transaction.
    pub fn raw_bytes(&self) -> Vec<u8> {
        serialize(&self.tx)
    }

    /// Consensus-encoded transaction as lowercase hex.
    pub fn raw_hex(&self) -> String {
        serialize_hex(&self.tx)
    }
}

/// Output being spent by the reveal, as recorded for the sighash.
pub(crate) fn commit_prevout(session: &CommitSession, commit_amount: Amount) -> TxOut {
    TxOut {
        value: commit_amount,
        script_pubkey: session.commit_address().script_pubkey(),
    }
}

/// Reveal transaction with its single input and no outputs yet.
pub(crate) fn build_unsigned_reveal(commit_outpoint: OutPoint) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: commit_outpoint,
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::new(),
        }],
        output: Vec::new(),
    }
}

/// Rejects transactions nodes would refuse to relay for their weight.
pub(crate) fn ensure_standard_weight(tx: &Transaction) -> Result<(), CommitRevealError> {
    let weight = tx.weight();
    if weight > MAX_STANDARD_TX_WEIGHT {
        return Err(CommitRevealError::RevealTooHeavy {
            weight: weight.to_wu(),
            max: MAX_STANDARD_TX_WEIGHT.to_wu(),
        });
    }
    Ok(())
}

/// Builds and signs the transaction spending the commit output through the envelope leaf.
///
/// Pays `commit_amount - fee` to the destination, where the fee covers the exact virtual size
/// of the signed transaction at `fee_rate`.
#[instrument(
    skip_all,
    fields(commit_outpoint = %params.commit_outpoint, fee_rate = params.fee_rate)
)]
pub fn assemble_reveal(
    session: &CommitSession,
    params: &RevealParams,
) -> Result<RevealTx, CommitRevealError> {
    if params.fee_rate == 0 {
        return Err(CommitRevealError::ZeroFeeRate);
    }

    let destination = params
        .destination
        .clone()
        .require_network(session.network())?;
    let control_block = session.control_block()?;
    let prevout = commit_prevout(session, params.commit_amount);
    let mut tx = build_unsigned_reveal(params.commit_outpoint);

    let signer = RevealSigner::new(session.keypair(), session.envelope_script(), &control_block);
    let destination_spk = destination.script_pubkey();

    let fee = estimate_reveal_fee(
        &tx,
        &prevout,
        &destination_spk,
        params.commit_amount,
        params.fee_rate,
        &signer,
    )?;

    if fee >= params.commit_amount {
        return Err(CommitRevealError::FeeExceedsAmount {
            fee: fee.to_sat(),
            amount: params.commit_amount.to_sat(),
        });
    }
    let value = params.commit_amount - fee;

    let dust = destination_spk.minimal_non_dust();
    if value < dust {
        return Err(CommitRevealError::DustOutput {
            value: value.to_sat(),
            dust: dust.to_sat(),
        });
    }

    tx.output.push(TxOut {
        value,
        script_pubkey: destination_spk,
    });
    signer.sign(&mut tx, &prevout)?;
    ensure_standard_weight(&tx)?;

    debug!(
        txid = %tx.compute_txid(),
        vsize = tx.vsize(),
        fee = fee.to_sat(),
        value = value.to_sat(),
        "signed reveal transaction"
    );

    Ok(RevealTx { tx, fee })
}

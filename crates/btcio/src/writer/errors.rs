use bitcoin::{address, bip32, sighash, taproot::TaprootBuilderError};
use inscriber_envelope::EnvelopeBuildError;
use thiserror::Error;

/// Errors that can occur while building commit and reveal transactions.
#[derive(Debug, Error)]
pub enum CommitRevealError {
    /// The memo fits in an `OP_RETURN` output and does not need an envelope.
    #[error("payload of {len} bytes is too short for an envelope, need at least {min}")]
    PayloadTooShort { len: usize, min: usize },

    /// The reveal carrying the memo would be too heavy to relay.
    #[error("payload of {len} bytes is too long for an envelope, at most {max} allowed")]
    PayloadTooLong { len: usize, max: usize },

    /// The signed reveal exceeds the standard transaction weight.
    #[error("reveal transaction weighs {weight} WU, above the standard limit of {max} WU")]
    RevealTooHeavy { weight: u64, max: u64 },

    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeBuildError),

    /// The reveal fee would consume the whole commit output.
    #[error("reveal fee of {fee} sat leaves nothing of the {amount} sat commit output")]
    FeeExceedsAmount { fee: u64, amount: u64 },

    /// The reveal output would be rejected by relay policy.
    #[error("reveal output of {value} sat is below the dust limit of {dust} sat")]
    DustOutput { value: u64, dust: u64 },

    #[error("fee for {vsize} vbytes at {fee_rate} sat/vB overflows")]
    FeeOverflow { vsize: u64, fee_rate: u64 },

    #[error("fee rate must be positive")]
    ZeroFeeRate,

    #[error("key derivation: {0}")]
    KeyDerivation(#[from] bip32::Error),

    #[error("taproot builder: {0}")]
    TaprootBuilder(#[from] TaprootBuilderError),

    #[error("could not finalize taproot spend info")]
    TaprootFinalize,

    #[error("cannot create control block for the envelope leaf")]
    ControlBlock,

    #[error("sighash: {0}")]
    Sighash(#[from] sighash::TaprootError),

    /// The destination address is malformed or belongs to another network.
    #[error("destination address: {0}")]
    Address(#[from] address::ParseError),
}

//! Commit/reveal writer: derives commit addresses, assembles and signs reveal transactions, and
//! tracks the sessions in between.

mod commit;
mod errors;
mod fee;
mod reveal;
mod session;
mod signer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use commit::{derive_commit_address, CommitSession};
pub use errors::CommitRevealError;
pub use fee::estimate_reveal_fee;
pub use reveal::{assemble_reveal, RevealParams, RevealTx, MAX_STANDARD_TX_WEIGHT};
pub use session::{SessionError, SessionId, SessionTable};
pub use signer::{generate_key_pair, RevealSigner};

//! Commit/reveal transaction construction for memos carried in taproot envelopes.
//!
//! A memo longer than an `OP_RETURN` output can hold is committed to a fresh taproot address
//! whose only script leaf embeds the memo. Once the caller funds that address, the reveal
//! transaction spends it through the script path, exposing the memo in the witness.

pub mod params;
pub mod payload;
pub mod writer;

pub use params::WriterParams;
pub use payload::Payload;

//! Tapscript envelope format used to carry oversized cross-chain memos.
//!
//! A memo that does not fit into an `OP_RETURN` output is embedded into the leaf script of a
//! single-leaf taproot tree and revealed through a script-path spend. The leaf has the
//! following structure:
//!
//! ```text
//! <x-only pubkey>
//! OP_CHECKSIG
//! OP_FALSE
//! OP_IF
//!   <chunk_0>
//!   ...
//!   <chunk_n>
//! OP_ENDIF
//! ```
//!
//! Chunks are at most [`MAX_SCRIPT_ELEMENT_SIZE`](bitcoin::constants::MAX_SCRIPT_ELEMENT_SIZE)
//! bytes long. The `OP_FALSE OP_IF` branch never executes, so the chunks are inert data
//! committed to the chain. There is no content type or any other attribute, only raw bytes.
//!
//! # Examples
//!
//! ```
//! use std::str::FromStr;
//!
//! use bitcoin::secp256k1::XOnlyPublicKey;
//! use inscriber_envelope::{build_envelope_script, parse_envelope_script};
//!
//! let pubkey = XOnlyPublicKey::from_str(
//!     "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
//! )
//! .unwrap();
//! let payload = vec![7u8; 600];
//!
//! let script = build_envelope_script(&pubkey, &payload).unwrap();
//! let envelope = parse_envelope_script(&script).unwrap();
//! assert_eq!(envelope.payload, payload);
//! ```

/// Envelope script builder.
pub mod builder;

/// Error types for envelope operations.
pub mod errors;

/// Envelope script parser.
pub mod parser;

/// Witness inspection helpers.
pub mod witness;

pub use builder::{build_envelope_script, envelope_chunk_count};
pub use errors::{EnvelopeBuildError, EnvelopeParseError};
pub use parser::{parse_envelope_script, ParsedEnvelope};
pub use witness::{extract_envelope_from_witness, script_from_witness, TAPROOT_ANNEX_PREFIX};

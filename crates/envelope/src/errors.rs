use bitcoin::script;
use thiserror::Error;

/// Errors that can occur while building an envelope script.
#[derive(Debug, Error)]
pub enum EnvelopeBuildError {
    /// A payload chunk is larger than a single script push may be.
    #[error("payload chunk of {chunk_size} bytes exceeds the {max} byte push limit")]
    OversizedChunk {
        /// Size of the offending chunk.
        chunk_size: usize,
        /// Maximum size of a single push.
        max: usize,
    },

    /// Failed to convert a payload chunk into `PushBytesBuf`.
    #[error("failed to convert {chunk_size} byte payload chunk to push bytes buffer")]
    PayloadChunkConversion {
        /// Size of the chunk that failed to convert.
        chunk_size: usize,
    },
}

/// Errors that can occur while parsing an envelope script.
#[derive(Debug, Error)]
pub enum EnvelopeParseError {
    /// The script does not start with a 32 byte x-only public key push.
    #[error("public key not found")]
    MissingPubkey,

    /// The leading push is not a valid x-only public key.
    #[error("invalid x-only public key")]
    InvalidPubkey,

    /// The public key is not followed by `OP_CHECKSIG`.
    #[error("OP_CHECKSIG not found")]
    MissingChecksig,

    /// The envelope branch does not start with `OP_FALSE`.
    #[error("OP_FALSE not found")]
    MissingOpFalse,

    /// `OP_FALSE` is not followed by `OP_IF`.
    #[error("OP_IF not found")]
    MissingOpIf,

    /// Something other than a data push was found inside the envelope branch.
    #[error("expecting data push inside envelope, found {0}")]
    UnexpectedInstruction(String),

    /// The script ended before `OP_ENDIF`.
    #[error("script ended before OP_ENDIF")]
    Unterminated,

    /// The script bytes could not be decoded into instructions.
    #[error("malformed script: {0}")]
    Script(#[from] script::Error),
}

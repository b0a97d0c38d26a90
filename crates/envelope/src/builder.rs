use bitcoin::{
    blockdata::script,
    constants::MAX_SCRIPT_ELEMENT_SIZE,
    opcodes::{
        all::{OP_CHECKSIG, OP_ENDIF, OP_IF},
        OP_FALSE,
    },
    script::PushBytesBuf,
    secp256k1::XOnlyPublicKey,
    ScriptBuf,
};

use crate::errors::EnvelopeBuildError;

/// Builds the envelope leaf script for `payload`, spendable by the owner of `pubkey`.
///
/// Creates a script with the structure
/// `<pubkey> OP_CHECKSIG OP_FALSE OP_IF <payload_chunks> OP_ENDIF`. The payload is split into
/// chunks of up to [`MAX_SCRIPT_ELEMENT_SIZE`] bytes, pushed in payload order.
///
/// The payload length is not checked here. Memos of 80 bytes or less are expected to go
/// through an `OP_RETURN` output instead, which is left to the caller.
///
/// # Errors
///
/// Returns [`EnvelopeBuildError`] if a payload chunk cannot be pushed as a single script
/// element.
pub fn build_envelope_script(
    pubkey: &XOnlyPublicKey,
    payload: &[u8],
) -> Result<ScriptBuf, EnvelopeBuildError> {
    let mut builder = script::Builder::new()
        .push_x_only_key(pubkey)
        .push_opcode(OP_CHECKSIG)
        .push_opcode(OP_FALSE)
        .push_opcode(OP_IF);

    for chunk in payload.chunks(MAX_SCRIPT_ELEMENT_SIZE) {
        builder = builder.push_slice(chunk_to_push_bytes(chunk)?);
    }

    Ok(builder.push_opcode(OP_ENDIF).into_script())
}

/// Number of data pushes an envelope carrying `payload_len` bytes contains.
pub fn envelope_chunk_count(payload_len: usize) -> usize {
    payload_len.div_ceil(MAX_SCRIPT_ELEMENT_SIZE)
}

fn chunk_to_push_bytes(chunk: &[u8]) -> Result<PushBytesBuf, EnvelopeBuildError> {
    if chunk.len() > MAX_SCRIPT_ELEMENT_SIZE {
        return Err(EnvelopeBuildError::OversizedChunk {
            chunk_size: chunk.len(),
            max: MAX_SCRIPT_ELEMENT_SIZE,
        });
    }

    PushBytesBuf::try_from(chunk.to_vec()).map_err(|_| {
        EnvelopeBuildError::PayloadChunkConversion {
            chunk_size: chunk.len(),
        }
    })
}

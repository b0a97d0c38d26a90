use bitcoin::{
    opcodes::all::{OP_CHECKSIG, OP_ENDIF, OP_IF},
    script::{Instruction, Instructions},
    secp256k1::XOnlyPublicKey,
    Opcode, Script,
};

use crate::errors::EnvelopeParseError;

/// Contents of a decoded envelope leaf script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    /// Key that authorizes the script-path spend.
    pub pubkey: XOnlyPublicKey,

    /// Concatenation of all chunks pushed inside the `OP_FALSE OP_IF` branch.
    pub payload: Vec<u8>,
}

/// Decodes an envelope leaf script produced by
/// [`build_envelope_script`](crate::builder::build_envelope_script).
///
/// This is the decoding rule observers apply to revealed witness data:
///
/// ```text
/// OP_PUSHBYTES_32 <pubkey> OP_CHECKSIG OP_FALSE OP_IF <push>* OP_ENDIF
/// ```
///
/// # Errors
///
/// Returns [`EnvelopeParseError`] if the script deviates from that structure.
pub fn parse_envelope_script(script: &Script) -> Result<ParsedEnvelope, EnvelopeParseError> {
    let mut instructions = script.instructions();

    let pubkey = parse_container(&mut instructions)?;
    enter_envelope(&mut instructions)?;
    let payload = extract_until_op_endif(&mut instructions)?;

    Ok(ParsedEnvelope { pubkey, payload })
}

/// Checks for `<pubkey> OP_CHECKSIG` at the start of the script.
fn parse_container(
    instructions: &mut Instructions<'_>,
) -> Result<XOnlyPublicKey, EnvelopeParseError> {
    let pubkey = match instructions.next() {
        Some(Ok(Instruction::PushBytes(bytes))) if bytes.len() == 32 => {
            XOnlyPublicKey::from_slice(bytes.as_bytes())
                .map_err(|_| EnvelopeParseError::InvalidPubkey)?
        }
        Some(Err(e)) => return Err(e.into()),
        _ => return Err(EnvelopeParseError::MissingPubkey),
    };

    if next_op(instructions)? != Some(OP_CHECKSIG) {
        return Err(EnvelopeParseError::MissingChecksig);
    }

    Ok(pubkey)
}

/// Checks for consecutive `OP_FALSE` and `OP_IF` that mark the beginning of an envelope.
fn enter_envelope(instructions: &mut Instructions<'_>) -> Result<(), EnvelopeParseError> {
    // OP_FALSE decodes as an empty push.
    match instructions.next() {
        Some(Ok(Instruction::PushBytes(bytes))) if bytes.is_empty() => {}
        Some(Err(e)) => return Err(e.into()),
        _ => return Err(EnvelopeParseError::MissingOpFalse),
    }

    if next_op(instructions)? != Some(OP_IF) {
        return Err(EnvelopeParseError::MissingOpIf);
    }

    Ok(())
}

/// Concatenates data pushes until `OP_ENDIF`.
fn extract_until_op_endif(
    instructions: &mut Instructions<'_>,
) -> Result<Vec<u8>, EnvelopeParseError> {
    let mut data = Vec::new();
    for elem in instructions {
        match elem? {
            Instruction::Op(OP_ENDIF) => return Ok(data),
            Instruction::PushBytes(bytes) if !bytes.is_empty() => {
                data.extend_from_slice(bytes.as_bytes());
            }
            Instruction::PushBytes(_) => {
                return Err(EnvelopeParseError::UnexpectedInstruction(
                    "OP_0".to_owned(),
                ));
            }
            Instruction::Op(op) => {
                return Err(EnvelopeParseError::UnexpectedInstruction(op.to_string()));
            }
        }
    }
    Err(EnvelopeParseError::Unterminated)
}

/// Extracts the next instruction as an opcode, if it is one.
fn next_op(instructions: &mut Instructions<'_>) -> Result<Option<Opcode>, EnvelopeParseError> {
    match instructions.next() {
        Some(Ok(Instruction::Op(op))) => Ok(Some(op)),
        Some(Err(e)) => Err(e.into()),
        _ => Ok(None),
    }
}

use bitcoin::{Script, Witness};

use crate::{errors::EnvelopeParseError, parser::parse_envelope_script, ParsedEnvelope};

/// First byte of the last witness element that marks it as a taproot annex (BIP-341).
pub const TAPROOT_ANNEX_PREFIX: u8 = 0x50;

/// Returns the leaf script of a taproot script-path spend.
///
/// The witness stack of such a spend ends with `<script> <control_block>`, optionally followed
/// by an annex. Returns `None` for key-path spends and witnesses too short to hold a script.
pub fn script_from_witness(witness: &Witness) -> Option<&Script> {
    let mut len = witness.len();

    let has_annex = len >= 2
        && witness
            .last()
            .and_then(|elem| elem.first())
            .is_some_and(|b| *b == TAPROOT_ANNEX_PREFIX);
    if has_annex {
        len -= 1;
    }

    if len < 2 {
        return None;
    }

    witness.nth(len - 2).map(Script::from_bytes)
}

/// Extracts and decodes the envelope carried by a taproot script-path witness.
///
/// Returns `Ok(None)` if the witness does not contain a leaf script at all.
pub fn extract_envelope_from_witness(
    witness: &Witness,
) -> Result<Option<ParsedEnvelope>, EnvelopeParseError> {
    script_from_witness(witness)
        .map(parse_envelope_script)
        .transpose()
}

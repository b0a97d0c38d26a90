use std::fmt;

use crate::writer::CommitRevealError;

/// Length of the destination account identifier at the start of every memo.
pub const DESTINATION_LEN: usize = 20;

/// Largest memo an `OP_RETURN` output can carry. Anything up to this size does not need an
/// envelope.
pub const MAX_OP_RETURN_PAYLOAD: usize = 80;

/// Largest memo accepted for an envelope. The signed reveal carrying a memo of this size stays
/// below the 400,000 WU standardness limit with room to spare.
pub const MAX_PAYLOAD_LEN: usize = 390_000;

/// Memo to be embedded in an envelope: `destination (20 bytes) ‖ message`.
///
/// Always longer than [`MAX_OP_RETURN_PAYLOAD`] bytes and at most [`MAX_PAYLOAD_LEN`] bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Wraps raw memo bytes, rejecting memos short enough for an `OP_RETURN` output and memos
    /// too large for a relayable reveal.
    pub fn new(bytes: Vec<u8>) -> Result<Self, CommitRevealError> {
        if bytes.len() <= MAX_OP_RETURN_PAYLOAD {
            return Err(CommitRevealError::PayloadTooShort {
                len: bytes.len(),
                min: MAX_OP_RETURN_PAYLOAD + 1,
            });
        }
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(CommitRevealError::PayloadTooLong {
                len: bytes.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        Ok(Self(bytes))
    }

    /// Concatenates a destination identifier and a message into a memo.
    pub fn from_parts(
        destination: [u8; DESTINATION_LEN],
        message: &[u8],
    ) -> Result<Self, CommitRevealError> {
        let mut bytes = Vec::with_capacity(DESTINATION_LEN + message.len());
        bytes.extend_from_slice(&destination);
        bytes.extend_from_slice(message);
        Self::new(bytes)
    }

    /// Destination account identifier on the other chain.
    pub fn destination(&self) -> [u8; DESTINATION_LEN] {
        let mut dest = [0u8; DESTINATION_LEN];
        dest.copy_from_slice(&self.0[..DESTINATION_LEN]);
        dest
    }

    /// Message following the destination identifier.
    pub fn message(&self) -> &[u8] {
        &self.0[DESTINATION_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true, memos are always longer than an `OP_RETURN` payload.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

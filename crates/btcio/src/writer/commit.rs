use std::fmt;

use bitcoin::{
    key::Keypair,
    secp256k1::XOnlyPublicKey,
    taproot::{ControlBlock, LeafVersion, TaprootBuilder, TaprootSpendInfo},
    Address, Network, Script, ScriptBuf,
};
use inscriber_envelope::build_envelope_script;
use rand::rngs::OsRng;
use secp256k1::SECP256K1;
use tracing::*;

use super::{
    errors::CommitRevealError,
    reveal::{assemble_reveal, RevealParams, RevealTx},
    signer::generate_key_pair,
};
use crate::payload::Payload;

/// Derives the taproot commit address for a single-leaf tree holding `envelope_script`.
///
/// The internal key is the x-only half of `keypair`, so the output can also be spent through the
/// key path by the same key.
pub fn derive_commit_address(
    keypair: &Keypair,
    envelope_script: &ScriptBuf,
    network: Network,
) -> Result<(Address, TaprootSpendInfo), CommitRevealError> {
    let (internal_key, _) = keypair.x_only_public_key();

    let spend_info = TaprootBuilder::new()
        .add_leaf(0, envelope_script.clone())?
        .finalize(SECP256K1, internal_key)
        .map_err(|_| CommitRevealError::TaprootFinalize)?;

    let address = Address::p2tr(SECP256K1, internal_key, spend_info.merkle_root(), network);

    Ok((address, spend_info))
}

/// A commit that is waiting to be funded and revealed.
///
/// Holds the ephemeral key, so it must not outlive its reveal. [`CommitSession::reveal`] takes
/// the session by value.
pub struct CommitSession {
    keypair: Keypair,
    envelope_script: ScriptBuf,
    spend_info: TaprootSpendInfo,
    network: Network,
    commit_address: Address,
}

impl CommitSession {
    /// Starts a session for `payload` with a freshly generated key.
    pub fn new(payload: &Payload, network: Network) -> Result<Self, CommitRevealError> {
        let keypair = generate_key_pair(&mut OsRng, network)?;
        Self::with_keypair(payload, keypair, network)
    }

    /// Starts a session for `payload` signed by `keypair`.
    #[instrument(skip_all, fields(payload_len = payload.len(), network = %network))]
    pub fn with_keypair(
        payload: &Payload,
        keypair: Keypair,
        network: Network,
    ) -> Result<Self, CommitRevealError> {
        let (pubkey, _) = keypair.x_only_public_key();
        let envelope_script = build_envelope_script(&pubkey, payload.as_bytes())?;
        let (commit_address, spend_info) =
            derive_commit_address(&keypair, &envelope_script, network)?;

        debug!(
            script_len = envelope_script.len(),
            %commit_address,
            "built envelope commitment"
        );

        Ok(Self {
            keypair,
            envelope_script,
            spend_info,
            network,
            commit_address,
        })
    }

    /// Address the caller has to fund before revealing.
    pub fn commit_address(&self) -> &Address {
        &self.commit_address
    }

    pub fn envelope_script(&self) -> &Script {
        &self.envelope_script
    }

    pub fn spend_info(&self) -> &TaprootSpendInfo {
        &self.spend_info
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Key the envelope script checks the reveal signature against.
    pub fn internal_key(&self) -> XOnlyPublicKey {
        self.keypair.x_only_public_key().0
    }

    pub(crate) fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Control block proving the envelope leaf is committed to by the output key.
    pub fn control_block(&self) -> Result<ControlBlock, CommitRevealError> {
        self.spend_info
            .control_block(&(self.envelope_script.clone(), LeafVersion::TapScript))
            .ok_or(CommitRevealError::ControlBlock)
    }

    /// Consumes the session, producing the signed reveal transaction.
    pub fn reveal(self, params: &RevealParams) -> Result<RevealTx, CommitRevealError> {
        assemble_reveal(&self, params)
    }
}

impl fmt::Debug for CommitSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitSession")
            .field("internal_key", &self.internal_key())
            .field("network", &self.network)
            .field("commit_address", &self.commit_address)
            .finish_non_exhaustive()
    }
}

use std::slice;

use bitcoin::{
    bip32::Xpriv,
    hashes::Hash,
    key::Keypair,
    secp256k1::Message,
    sighash::{Prevouts, SighashCache},
    taproot::{ControlBlock, LeafVersion, TapLeafHash},
    Network, Script, TapSighashType, Transaction, TxOut, Witness,
};
use rand::{CryptoRng, RngCore};
use secp256k1::SECP256K1;
use zeroize::Zeroize;

use super::errors::CommitRevealError;

/// Generates a single-use key pair from 64 bytes of randomness used as a BIP32 master seed.
///
/// The seed and the intermediate extended key are wiped before returning.
pub fn generate_key_pair<R: RngCore + CryptoRng>(
    rng: &mut R,
    network: Network,
) -> Result<Keypair, CommitRevealError> {
    let mut seed = [0u8; 64];
    rng.fill_bytes(&mut seed);
    let xpriv = Xpriv::new_master(network, &seed);
    seed.zeroize();

    let mut xpriv = xpriv?;
    let keypair = xpriv.to_keypair(SECP256K1);
    xpriv.private_key.non_secure_erase();

    Ok(keypair)
}

/// Signs the single input of a reveal transaction through the envelope leaf.
#[derive(Debug, Clone, Copy)]
pub struct RevealSigner<'a> {
    keypair: &'a Keypair,
    envelope_script: &'a Script,
    control_block: &'a ControlBlock,
}

impl<'a> RevealSigner<'a> {
    pub fn new(
        keypair: &'a Keypair,
        envelope_script: &'a Script,
        control_block: &'a ControlBlock,
    ) -> Self {
        Self {
            keypair,
            envelope_script,
            control_block,
        }
    }

    /// Signs input 0 of `tx` spending `prevout` and replaces its witness with
    /// `[signature, envelope script, control block]`.
    pub fn sign(&self, tx: &mut Transaction, prevout: &TxOut) -> Result<(), CommitRevealError> {
        let sighash = SighashCache::new(&*tx).taproot_script_spend_signature_hash(
            0,
            &Prevouts::All(slice::from_ref(prevout)),
            TapLeafHash::from_script(self.envelope_script, LeafVersion::TapScript),
            TapSighashType::Default,
        )?;

        let mut aux_rand = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut aux_rand);
        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = SECP256K1.sign_schnorr_with_aux_rand(&msg, self.keypair, &aux_rand);

        let mut witness = Witness::new();
        witness.push(signature.serialize());
        witness.push(self.envelope_script.as_bytes());
        witness.push(self.control_block.serialize());
        tx.input[0].witness = witness;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::{OsRng, StdRng},
        SeedableRng,
    };

    use super::*;

    #[test]
    fn test_key_generation_is_seeded_by_rng() {
        let a = generate_key_pair(&mut StdRng::seed_from_u64(7), Network::Regtest).unwrap();
        let b = generate_key_pair(&mut StdRng::seed_from_u64(7), Network::Regtest).unwrap();
        let c = generate_key_pair(&mut StdRng::seed_from_u64(8), Network::Regtest).unwrap();

        assert_eq!(a.public_key(), b.public_key());
        assert_ne!(a.public_key(), c.public_key());
    }

    #[test]
    fn test_key_generation_from_os_rng() {
        let a = generate_key_pair(&mut OsRng, Network::Bitcoin).unwrap();
        let b = generate_key_pair(&mut OsRng, Network::Bitcoin).unwrap();
        assert_ne!(a.x_only_public_key().0, b.x_only_public_key().0);
    }
}

//! # Client-Side Signing
//!
//! Digest signing for meta-transaction submitters. The registry itself only
//! ever *recovers* signatures; this module exists for the other side of the
//! channel: wallets, relayers, and the test suite.

use k256::ecdsa::{SigningKey, VerifyingKey};

use registry_types::{Address, Hash};

use crate::ecdsa::{address_from_pubkey, invert_s, is_low_s, EcdsaSignature};

/// A freshly generated secp256k1 keypair plus its derived address.
pub struct Keypair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
    pub address: Address,
}

/// Generate a random keypair.
pub fn generate_keypair() -> Keypair {
    let signing_key = SigningKey::random(&mut rand::thread_rng());
    let verifying_key = *signing_key.verifying_key();
    let address = address_from_pubkey(&verifying_key);
    Keypair {
        signing_key,
        verifying_key,
        address,
    }
}

/// Sign a 32-byte digest, normalizing to the low-S form the verifier
/// accepts.
pub fn sign_digest(digest: &Hash, key: &SigningKey) -> EcdsaSignature {
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .expect("prehash signing cannot fail for a 32-byte digest");

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    // Normalize to low S; inverting S flips the recovery parity.
    if is_low_s(&s) {
        EcdsaSignature {
            r,
            s,
            v: recovery_id.to_byte() + 27,
        }
    } else {
        let v = if recovery_id.to_byte() == 0 { 28 } else { 27 };
        EcdsaSignature {
            r,
            s: invert_s(&s),
            v,
        }
    }
}

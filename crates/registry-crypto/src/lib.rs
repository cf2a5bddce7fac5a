//! # registry-crypto
//!
//! Cryptographic support for the DID identity registry.
//!
//! ## Architecture
//!
//! - [`ecdsa`]: secp256k1 signature recovery with malleability and scalar
//!   range validation; signatures recover to 20-byte addresses.
//! - [`digest`]: canonical meta-transaction digest construction. Every
//!   signed registry operation is authorized over one of these digests.
//! - [`signing`]: client-side signer used by relayers and tests to produce
//!   low-S recoverable signatures.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: signatures with high S values are
//!   rejected, so a third party cannot mint a second valid signature for a
//!   digest it observed.
//! - Replay protection is NOT handled here. The registry core binds each
//!   digest to the signer's current nonce; this crate only defines the
//!   digest layout and recovers the signer.

pub mod digest;
pub mod ecdsa;
pub mod errors;
pub mod signing;

pub use digest::MetaTxDigest;
pub use ecdsa::{address_from_pubkey, keccak256, recover_address, EcdsaSignature};
pub use errors::SignatureError;
pub use signing::{generate_keypair, sign_digest, Keypair};

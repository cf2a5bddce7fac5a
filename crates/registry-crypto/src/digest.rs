//! # Meta-Transaction Digests
//!
//! Canonical digest construction for signed registry operations.
//!
//! Every signed operation is authorized over the Keccak-256 of a packed
//! byte sequence with a fixed field order:
//!
//! ```text
//! 0x19 0x00 | registry id (20) | nonce (32, BE) | identity (20)
//!          | operation tag (UTF-8) | semantic fields...
//! ```
//!
//! The `0x19 0x00` prefix cannot begin a valid ledger transaction, so a
//! registry digest never doubles as one. The signer's *current* nonce is
//! bound into the digest; once the nonce advances, the same signature no
//! longer verifies.
//!
//! Field encodings are fixed-width per type: addresses 20 bytes, `bytes32`
//! labels verbatim, integers as 32-byte big-endian, booleans one byte.
//! Variable-length byte strings (attribute names/values) are folded to
//! their Keccak-256 hash, keeping the layout unambiguous without length
//! prefixes.

use registry_types::{Address, DelegateType, Hash};

use crate::ecdsa::keccak256;

/// Fixed two-byte domain prefix.
const PREFIX: [u8; 2] = [0x19, 0x00];

/// Builder for a signed-operation digest.
///
/// ```
/// use registry_crypto::MetaTxDigest;
///
/// let registry = [0x11; 20];
/// let identity = [0x22; 20];
/// let delegate = [0x33; 20];
/// let digest = MetaTxDigest::new(registry, 0, identity, "addDelegate")
///     .bytes32([0u8; 32])
///     .address(delegate)
///     .uint(86_400)
///     .finish();
/// assert_eq!(digest.len(), 32);
/// ```
#[derive(Clone, Debug)]
pub struct MetaTxDigest {
    buf: Vec<u8>,
}

impl MetaTxDigest {
    /// Start a digest for `operation_tag` bound to the registry instance,
    /// the signer's current nonce, and the target identity.
    pub fn new(registry_id: Address, nonce: u64, identity: Address, operation_tag: &str) -> Self {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(&PREFIX);
        buf.extend_from_slice(&registry_id);
        push_uint(&mut buf, nonce);
        buf.extend_from_slice(&identity);
        buf.extend_from_slice(operation_tag.as_bytes());
        Self { buf }
    }

    /// Append a 20-byte address field.
    pub fn address(mut self, address: Address) -> Self {
        self.buf.extend_from_slice(&address);
        self
    }

    /// Append a 32-byte label field (delegate types).
    pub fn bytes32(mut self, value: DelegateType) -> Self {
        self.buf.extend_from_slice(&value);
        self
    }

    /// Append an unsigned integer as 32-byte big-endian.
    pub fn uint(mut self, value: u64) -> Self {
        push_uint(&mut self.buf, value);
        self
    }

    /// Append a boolean as a single byte.
    pub fn boolean(mut self, value: bool) -> Self {
        self.buf.push(value as u8);
        self
    }

    /// Append a variable-length byte string, folded to its Keccak-256 hash.
    pub fn content(mut self, data: &[u8]) -> Self {
        self.buf.extend_from_slice(&keccak256(data));
        self
    }

    /// Finalize into the 32-byte signing digest.
    pub fn finish(self) -> Hash {
        keccak256(&self.buf)
    }
}

/// Left-pad a u64 into a 32-byte big-endian word.
fn push_uint(buf: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    buf.extend_from_slice(&word);
}

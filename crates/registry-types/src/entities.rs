//! # Shared Primitives
//!
//! Address-like identifiers and hash types shared across the workspace.
//!
//! ## Type Decisions
//!
//! - `Address` is a raw 20-byte array (Keccak-derived account identifier).
//!   A newtype wrapper would buy nothing here: addresses are opaque keys,
//!   never arithmetic operands.
//! - `UnixSeconds` is `u64`. Validity horizons are absolute UNIX timestamps
//!   supplied by the execution environment; the registry never reads a
//!   system clock.

/// 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// 20-byte account identifier (last 20 bytes of the Keccak-256 of an
/// uncompressed secp256k1 public key).
pub type Address = [u8; 20];

/// Absolute UNIX timestamp in seconds.
pub type UnixSeconds = u64;

/// Delegate capability type, a left-aligned zero-padded 32-byte label
/// (e.g. `"sigAuth"`, `"veriKey"`).
pub type DelegateType = [u8; 32];

/// The null/zero sentinel address. Returned as the controller of a
/// deactivated identity; never a valid signer.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Build a [`DelegateType`] from a UTF-8 label.
///
/// The label is copied into the low-index bytes and the remainder is
/// zero-padded; labels longer than 32 bytes are truncated.
pub fn delegate_type(label: &str) -> DelegateType {
    let mut out = [0u8; 32];
    let bytes = label.as_bytes();
    let len = bytes.len().min(32);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Lowercase `0x`-prefixed rendering of an address, for logs and test
/// diagnostics.
pub fn hex_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

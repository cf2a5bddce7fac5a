use registry_types::Address;
use thiserror::Error;

/// Signature validation and recovery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// R or S is zero, not below the curve order, or otherwise malformed.
    #[error("signature component out of range")]
    InvalidFormat,

    /// S is in the upper half of the curve order (EIP-2).
    #[error("malleable signature: high S value")]
    MalleableSignature,

    /// Recovery id is not one of 0, 1, 27, 28.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// The curve point recovery itself failed.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// The signature recovered to an address other than the authorized one.
    #[error("signer mismatch: expected {expected:?}, recovered {actual:?}")]
    SignerMismatch { expected: Address, actual: Address },
}

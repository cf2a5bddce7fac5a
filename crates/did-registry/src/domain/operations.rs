//! # Operations and Effects
//!
//! The serializable command surface. The hosting environment totally orders
//! [`Transaction`]s and hands them to
//! [`RegistryService::apply`](crate::service::RegistryService::apply); each
//! either fully applies (yielding an [`Effect`]) or fails with a
//! [`RegistryError`](super::errors::RegistryError) and no state change.

use registry_crypto::EcdsaSignature;
use registry_types::{Address, DelegateType, UnixSeconds};
use serde::{Deserialize, Serialize};

/// One totally-ordered submission: who called, when, and what.
///
/// `now` is the single consistent timestamp for the whole operation; the
/// core never reads a clock of its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub caller: Address,
    pub now: UnixSeconds,
    pub operation: Operation,
}

/// The full mutating operation surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    AddController {
        identity: Address,
        controller: Address,
    },
    RemoveController {
        identity: Address,
        controller: Address,
    },
    ChangeController {
        identity: Address,
        controller: Address,
    },
    RotateMainController {
        identity: Address,
        controller: Address,
    },
    EnrollNewAndSetMainController {
        identity: Address,
        controller: Address,
    },
    DeactivateAccount {
        identity: Address,
    },
    DeactivateControllers {
        identity: Address,
    },
    EnableKeyRotation {
        identity: Address,
        window_seconds: u64,
    },
    DisableKeyRotation {
        identity: Address,
    },
    AddDelegate {
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
    },
    AddDelegateSigned {
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
    },
    RevokeDelegate {
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
    },
    RevokeDelegateSigned {
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
    },
    SetAttribute {
        identity: Address,
        name: Vec<u8>,
        value: Vec<u8>,
        validity_seconds: u64,
    },
    SetAttributeSigned {
        identity: Address,
        signature: EcdsaSignature,
        name: Vec<u8>,
        value: Vec<u8>,
        validity_seconds: u64,
    },
    RevokeAttribute {
        identity: Address,
        name: Vec<u8>,
        value: Vec<u8>,
        backdate_seconds: u64,
        compromised: bool,
    },
    RevokeAttributeSigned {
        identity: Address,
        signature: EcdsaSignature,
        name: Vec<u8>,
        value: Vec<u8>,
        backdate_seconds: u64,
        compromised: bool,
    },
    AddAkaIdentifier {
        identity: Address,
        aka_id: String,
        validity_seconds: u64,
    },
    RemoveAkaIdentifier {
        identity: Address,
        aka_id: String,
    },
    Recover {
        identity: Address,
        signature: EcdsaSignature,
        candidate: Address,
    },
}

/// What an applied operation did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// State changed; records were appended under this sequence number.
    Changed { seq: u64 },
    /// A recovery vote was processed (state may or may not have changed).
    RecoveryVote(RecoveryOutcome),
}

/// Result of one `recover` submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    /// Whether the vote map changed (false for a repeated identical vote or
    /// a well-formed signature from a non-backup-controller).
    pub vote_added: bool,
    /// Whether the vote completed a quorum and seated the candidate.
    pub main_controller_changed: bool,
    /// Sequence number of the emitted records when the election fired.
    pub seq: Option<u64>,
}

//! # Change-Record Payloads
//!
//! One [`ChangeRecord`] per emitted change, linked backward per identity:
//! `previous_change` is the identity's change pointer from before the
//! operation that emitted the record, 0 terminating the chain. An indexer
//! reconstructs an identity's full history by reading
//! `changed(identity)`, fetching the records at that sequence number, and
//! following `previous_change` down to 0.

use registry_types::{Address, DelegateType, UnixSeconds};
use serde::{Deserialize, Serialize};

/// A single change emitted by an applied operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub identity: Address,
    /// Sequence number of the emitting operation. Records of one operation
    /// share it.
    pub seq: u64,
    /// The identity's change pointer before this operation; 0 ends the
    /// chain.
    pub previous_change: u64,
    pub payload: ChangePayload,
}

/// What changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChangePayload {
    ControllerAdded {
        /// The controller that authorized the addition.
        actor: Address,
        controller: Address,
    },
    ControllerRemoved {
        controller: Address,
    },
    /// The main controller changed (rotation, change, enrollment, or a
    /// completed recovery).
    ControllerChanged {
        controller: Address,
    },
    ControllersDeactivated {
        /// How many controllers the deactivation cleared.
        removed: u32,
    },
    AccountDeactivated,
    KeyRotationEnabled {
        window_seconds: u64,
    },
    KeyRotationDisabled,
    DelegateChanged {
        delegate_type: DelegateType,
        delegate: Address,
        valid_to: UnixSeconds,
        compromised: bool,
    },
    AttributeChanged {
        /// Raw name bytes; storage keys hold only the content hash.
        name: Vec<u8>,
        value: Vec<u8>,
        valid_to: UnixSeconds,
        compromised: bool,
    },
    AkaChanged {
        aka_id: String,
        /// 0 marks a removal.
        valid_to: UnixSeconds,
    },
    RecoveryExecuted {
        new_main_controller: Address,
        votes: u32,
    },
}

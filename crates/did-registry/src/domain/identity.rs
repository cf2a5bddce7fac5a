//! # Identities and Controller Sets
//!
//! Per-identity controller state: the ordered controller set, the designated
//! main controller, the two deactivation flags, and the optional
//! key-rotation window.
//!
//! An identity that was never written to is its own controller. The first
//! successful `addController` materializes that implicit self-controller
//! into the stored set, so the set is never empty while the identity is
//! active.
//!
//! Terminal states:
//! - `deactivated`: the identity is dead. Its controller resolves to the
//!   zero sentinel and no further mutation succeeds.
//! - `controllers_deactivated`: the controller set was cleared. The
//!   identity record survives, but delegate/attribute/controller writes are
//!   rejected.

use std::collections::HashMap;

use registry_crypto::keccak256;
use registry_types::{Address, UnixSeconds, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};

use super::errors::RegistryError;

/// Stored state of one identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Ordered controller set, insertion order preserved.
    controllers: Vec<Address>,
    /// Explicit main controller. `None` means the identity itself (or, for
    /// a deactivated identity, the zero sentinel).
    main_controller: Option<Address>,
    deactivated: bool,
    controllers_deactivated: bool,
    /// Key-rotation window in seconds while rotation is enabled.
    key_rotation_window: Option<u64>,
}

impl IdentityRecord {
    pub fn controllers(&self) -> &[Address] {
        &self.controllers
    }

    pub fn is_controller(&self, address: &Address) -> bool {
        self.controllers.contains(address)
    }

    /// The controller an operation on `identity` must be authorized by at
    /// time `now`.
    ///
    /// While key rotation is enabled the effective controller cycles
    /// deterministically through the registered set: with window `w` and
    /// period `p = now / w`, the controller at
    /// `keccak256(p) % controllers.len()` is in charge for that period.
    fn effective_controller(&self, identity: Address, now: UnixSeconds) -> Address {
        if self.deactivated {
            return ZERO_ADDRESS;
        }
        if let Some(window) = self.key_rotation_window {
            if !self.controllers.is_empty() {
                let index = rotation_index(now / window, self.controllers.len());
                return self.controllers[index];
            }
        }
        self.main_controller.unwrap_or(identity)
    }
}

/// Deterministic index for the key-rotation period.
fn rotation_index(period: u64, len: usize) -> usize {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&period.to_be_bytes());
    let digest = keccak256(&word);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % len as u64) as usize
}

/// All identity records, keyed by identity address. Records are created
/// implicitly on first write and never physically deleted.
#[derive(Debug, Default)]
pub struct ControllerStore {
    records: HashMap<Address, IdentityRecord>,
}

impl ControllerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, identity: &Address) -> Option<&IdentityRecord> {
        self.records.get(identity)
    }

    fn record_mut(&mut self, identity: Address) -> &mut IdentityRecord {
        self.records.entry(identity).or_default()
    }

    /// Reject mutation of a terminally deactivated identity. Checked before
    /// any other validation on every mutating operation.
    pub fn ensure_mutable(&self, identity: &Address) -> Result<(), RegistryError> {
        match self.record(identity) {
            Some(r) if r.deactivated => Err(RegistryError::AccountWasDeactivated),
            Some(r) if r.controllers_deactivated => Err(RegistryError::ControllersDeactivated),
            _ => Ok(()),
        }
    }

    /// The address authorized to mutate `identity` at `now`. Zero sentinel
    /// for deactivated identities; the identity itself when no controller
    /// was ever registered.
    pub fn effective_controller(&self, identity: Address, now: UnixSeconds) -> Address {
        match self.record(&identity) {
            None => identity,
            Some(record) => record.effective_controller(identity, now),
        }
    }

    /// The registered controller set, in insertion order.
    pub fn controllers(&self, identity: &Address) -> Vec<Address> {
        self.record(identity)
            .map(|r| r.controllers.clone())
            .unwrap_or_default()
    }

    pub fn is_account_deactivated(&self, identity: &Address) -> bool {
        self.record(identity).is_some_and(|r| r.deactivated)
    }

    pub fn are_controllers_deactivated(&self, identity: &Address) -> bool {
        self.record(identity)
            .is_some_and(|r| r.controllers_deactivated)
    }

    pub fn key_rotation_window(&self, identity: &Address) -> Option<u64> {
        self.record(identity).and_then(|r| r.key_rotation_window)
    }

    /// Register a backup controller.
    ///
    /// The first add materializes the identity's implicit self-controller,
    /// which is why adding the identity to itself fails as a duplicate even
    /// on a fresh record.
    pub fn add_controller(
        &mut self,
        identity: Address,
        controller: Address,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(identity);
        if record.controllers.is_empty() {
            if controller == identity {
                return Err(RegistryError::ControllerAlreadyExists(controller));
            }
            record.controllers.push(identity);
        }
        if record.is_controller(&controller) {
            return Err(RegistryError::ControllerAlreadyExists(controller));
        }
        record.controllers.push(controller);
        Ok(())
    }

    /// Remove a registered backup controller. The current main controller
    /// cannot be removed; rotate or change first.
    pub fn remove_controller(
        &mut self,
        identity: Address,
        controller: Address,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(identity);
        if !record.is_controller(&controller) {
            return Err(RegistryError::ControllerNotRegistered(controller));
        }
        let main = record.main_controller.unwrap_or(identity);
        if controller == main {
            return Err(RegistryError::ControllerIsMain(controller));
        }
        record.controllers.retain(|c| *c != controller);
        Ok(())
    }

    /// Make `controller` the main controller, registering it first if it is
    /// not yet in the set.
    pub fn change_controller(&mut self, identity: Address, controller: Address) {
        let record = self.record_mut(identity);
        if record.controllers.is_empty() && controller != identity {
            record.controllers.push(identity);
        }
        if !record.is_controller(&controller) {
            record.controllers.push(controller);
        }
        record.main_controller = Some(controller);
    }

    /// Swap the main controller to an already-registered backup.
    pub fn rotate_main_controller(
        &mut self,
        identity: Address,
        controller: Address,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(identity);
        if !record.is_controller(&controller) {
            return Err(RegistryError::ControllerNotRegistered(controller));
        }
        record.main_controller = Some(controller);
        Ok(())
    }

    /// Register a brand-new controller and immediately make it main.
    /// Enrolling an address that is already a controller is a duplicate.
    pub fn enroll_new_main_controller(
        &mut self,
        identity: Address,
        controller: Address,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(identity);
        if record.controllers.is_empty() {
            if controller == identity {
                return Err(RegistryError::ControllerAlreadyExists(controller));
            }
            record.controllers.push(identity);
        }
        if record.is_controller(&controller) {
            return Err(RegistryError::ControllerAlreadyExists(controller));
        }
        record.controllers.push(controller);
        record.main_controller = Some(controller);
        Ok(())
    }

    /// Seat an elected candidate as main controller, registering it if
    /// needed. Recovery-only path: normal authorization is bypassed because
    /// the quorum already decided.
    pub fn seat_recovered_controller(&mut self, identity: Address, controller: Address) {
        let record = self.record_mut(identity);
        if !record.is_controller(&controller) {
            record.controllers.push(controller);
        }
        record.main_controller = Some(controller);
    }

    /// One-way terminal transition: zero the main controller and kill the
    /// identity.
    pub fn deactivate_account(&mut self, identity: Address) {
        let record = self.record_mut(identity);
        record.main_controller = None;
        record.deactivated = true;
    }

    /// Clear the controller set without killing the identity. Returns how
    /// many controllers were removed.
    pub fn deactivate_controllers(&mut self, identity: Address) -> usize {
        let record = self.record_mut(identity);
        let removed = record.controllers.len();
        record.controllers.clear();
        record.main_controller = None;
        record.controllers_deactivated = true;
        removed
    }

    pub fn enable_key_rotation(
        &mut self,
        identity: Address,
        window_seconds: u64,
        minimum: u64,
    ) -> Result<(), RegistryError> {
        if window_seconds < minimum {
            return Err(RegistryError::KeyRotationWindowTooShort {
                requested: window_seconds,
                minimum,
            });
        }
        let record = self.record_mut(identity);
        if record.key_rotation_window.is_some() {
            return Err(RegistryError::KeyRotationAlreadyEnabled);
        }
        record.key_rotation_window = Some(window_seconds);
        Ok(())
    }

    pub fn disable_key_rotation(&mut self, identity: Address) -> Result<(), RegistryError> {
        let record = self.record_mut(identity);
        if record.key_rotation_window.is_none() {
            return Err(RegistryError::KeyRotationAlreadyDisabled);
        }
        record.key_rotation_window = None;
        Ok(())
    }
}

//! # Inbound Port (Driving Port)
//!
//! The registry's public operation surface. Mutating operations come in two
//! authorization flavors: direct (the `caller` must be the identity's
//! current controller) and signed (`*_signed` / `recover`, where any
//! submitter may relay a controller-signed meta-transaction).
//!
//! Every mutating call takes `now`, the externally supplied current time,
//! used consistently for the whole operation.

use registry_crypto::EcdsaSignature;
use registry_types::{Address, DelegateType, Hash, UnixSeconds};

use crate::domain::errors::RegistryError;
use crate::domain::operations::{Effect, RecoveryOutcome, Transaction};
use crate::events::ChangeRecord;

/// Primary API of the DID registry.
pub trait DidRegistryApi {
    /// Apply one totally-ordered submission. Dispatches to the typed
    /// operation it wraps; all-or-nothing.
    fn apply(&mut self, transaction: Transaction) -> Result<Effect, RegistryError>;

    // ------------------------------------------------------------------
    // Controller management
    // ------------------------------------------------------------------

    /// Register a backup controller for `identity`.
    fn add_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Remove a registered backup controller (never the main one).
    fn remove_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Make `controller` the main controller, registering it on the fly if
    /// needed.
    fn change_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Swap the main controller to an already-registered backup.
    fn rotate_main_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Register a brand-new controller and immediately make it main.
    fn enroll_new_and_set_main_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Terminal: kill the identity and zero its controller.
    fn deactivate_account(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    /// Clear the controller set without killing the identity.
    fn deactivate_controllers(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn enable_key_rotation(
        &mut self,
        caller: Address,
        identity: Address,
        window_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn disable_key_rotation(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    // ------------------------------------------------------------------
    // Delegates
    // ------------------------------------------------------------------

    fn add_delegate(
        &mut self,
        caller: Address,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn add_delegate_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn revoke_delegate(
        &mut self,
        caller: Address,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    #[allow(clippy::too_many_arguments)]
    fn revoke_delegate_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    // ------------------------------------------------------------------
    // Attributes (verification methods / services)
    // ------------------------------------------------------------------

    fn set_attribute(
        &mut self,
        caller: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn set_attribute_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        name: &[u8],
        value: &[u8],
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    #[allow(clippy::too_many_arguments)]
    fn revoke_attribute(
        &mut self,
        caller: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    #[allow(clippy::too_many_arguments)]
    fn revoke_attribute_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        name: &[u8],
        value: &[u8],
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    // ------------------------------------------------------------------
    // AlsoKnownAs identifiers
    // ------------------------------------------------------------------

    fn add_aka_identifier(
        &mut self,
        caller: Address,
        identity: Address,
        aka_id: &str,
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    fn remove_aka_identifier(
        &mut self,
        caller: Address,
        identity: Address,
        aka_id: &str,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError>;

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Process a backup controller's signed recovery vote for `candidate`.
    ///
    /// A structurally invalid signature is a hard
    /// [`RegistryError::InvalidSignature`]; a well-formed signature that
    /// does not belong to a registered backup controller yields
    /// `Ok` with `vote_added == false`.
    fn recover(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        candidate: Address,
        now: UnixSeconds,
    ) -> Result<RecoveryOutcome, RegistryError>;

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    /// The identity's current controller: the main controller, the rotation
    /// pick while key rotation is enabled, the identity itself when none
    /// was registered, or the zero sentinel after deactivation.
    fn identity_controller(&self, identity: Address, now: UnixSeconds) -> Address;

    fn get_controllers(&self, identity: Address) -> Vec<Address>;

    fn are_controllers_deactivated(&self, identity: Address) -> bool;

    fn is_account_deactivated(&self, identity: Address) -> bool;

    fn valid_delegate(
        &self,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        now: UnixSeconds,
    ) -> bool;

    /// The delegate grant's validity horizon, 0 if never granted.
    fn delegates(
        &self,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
    ) -> UnixSeconds;

    /// The attribute grant's validity horizon, keyed by content hashes.
    fn attributes(&self, identity: Address, name_hash: Hash, value_hash: Hash) -> UnixSeconds;

    /// The signer's next expected nonce.
    fn nonce(&self, signer: Address) -> u64;

    /// The identity's latest change pointer, 0 if it never changed.
    fn changed(&self, identity: Address) -> u64;

    /// The records emitted under one change pointer.
    fn changes_at(&self, seq: u64) -> &[ChangeRecord];

    /// The configured lower bound for key-rotation windows.
    fn min_key_rotation_time(&self) -> u64;
}

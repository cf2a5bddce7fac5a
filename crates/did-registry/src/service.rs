//! # Registry Service
//!
//! Application service implementing [`DidRegistryApi`]. Every mutating
//! operation runs the same pipeline:
//!
//! 1. terminal-state guards (`deactivated`, `controllers_deactivated`)
//! 2. authorization — the direct caller, or the signer recovered from a
//!    meta-transaction digest, must be the identity's current controller
//! 3. the domain mutation
//! 4. change-record append and pointer advance
//!
//! Direct and signed entry points share the mutation routines; the signed
//! path only swaps how the acting controller is resolved. All validation
//! happens before the first write, so a failed operation leaves no trace —
//! in particular, a rejected signature never consumes the signer's nonce.

use tracing::{debug, info, warn};

use registry_crypto::{keccak256, recover_address, EcdsaSignature, MetaTxDigest, SignatureError};
use registry_types::{hex_address, Address, DelegateType, Hash, UnixSeconds};

use crate::domain::changelog::ChangeLog;
use crate::domain::config::RegistryConfig;
use crate::domain::errors::RegistryError;
use crate::domain::grants::{AttributeGrants, DelegateGrants};
use crate::domain::identity::ControllerStore;
use crate::domain::nonces::NonceStore;
use crate::domain::operations::{Effect, Operation, RecoveryOutcome, Transaction};
use crate::domain::recovery::RecoveryEngine;
use crate::events::{ChangePayload, ChangeRecord};
use crate::ports::inbound::DidRegistryApi;

/// Operation tags bound into signed digests.
mod tags {
    pub const ADD_DELEGATE: &str = "addDelegate";
    pub const REVOKE_DELEGATE: &str = "revokeDelegate";
    pub const SET_ATTRIBUTE: &str = "setAttribute";
    pub const REVOKE_ATTRIBUTE: &str = "revokeAttribute";
    pub const RECOVER: &str = "recover";
}

/// The registry state machine. Owns all mutable state; the hosting
/// environment serializes calls and supplies `now`.
pub struct RegistryService {
    config: RegistryConfig,
    identities: ControllerStore,
    delegates: DelegateGrants,
    attributes: AttributeGrants,
    nonces: NonceStore,
    recovery: RecoveryEngine,
    changelog: ChangeLog,
}

impl RegistryService {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            identities: ControllerStore::new(),
            delegates: DelegateGrants::new(),
            attributes: AttributeGrants::new(),
            nonces: NonceStore::new(),
            recovery: RecoveryEngine::new(),
            changelog: ChangeLog::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ==========================================================================
    // AUTHORIZATION
    // ==========================================================================

    /// Direct-call authorization: the caller must be the identity's current
    /// controller.
    fn authorize(
        &self,
        identity: Address,
        caller: Address,
        now: UnixSeconds,
    ) -> Result<Address, RegistryError> {
        if caller == self.identities.effective_controller(identity, now) {
            Ok(caller)
        } else {
            Err(RegistryError::NotAuthorized)
        }
    }

    /// Meta-transaction authorization: rebuild the digest the current
    /// controller must have signed (bound to its current nonce) and check
    /// the signature recovers to that controller.
    fn verify_controller_signature<F>(
        &self,
        identity: Address,
        signature: &EcdsaSignature,
        tag: &str,
        now: UnixSeconds,
        fields: F,
    ) -> Result<Address, RegistryError>
    where
        F: FnOnce(MetaTxDigest) -> MetaTxDigest,
    {
        let controller = self.identities.effective_controller(identity, now);
        let digest = fields(MetaTxDigest::new(
            self.config.registry_id,
            self.nonces.current(&controller),
            identity,
            tag,
        ))
        .finish();

        let signer = recover_address(&digest, signature)?;
        if signer != controller {
            warn!(
                identity = %hex_address(&identity),
                signer = %hex_address(&signer),
                "rejected meta-transaction: signer is not the current controller"
            );
            return Err(RegistryError::InvalidSignature(
                SignatureError::SignerMismatch {
                    expected: controller,
                    actual: signer,
                },
            ));
        }
        Ok(controller)
    }

    // ==========================================================================
    // SHARED MUTATION ROUTINES
    // ==========================================================================
    //
    // Both authorization channels funnel into these; the signed path only
    // differs in how `actor` was resolved.

    fn grant_delegate_as(
        &mut self,
        actor: Address,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Effect {
        let valid_to = now.saturating_add(validity_seconds);
        self.delegates.set(identity, (delegate_type, delegate), valid_to);
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::DelegateChanged {
                delegate_type,
                delegate,
                valid_to,
                compromised: false,
            }],
        );
        debug!(
            identity = %hex_address(&identity),
            delegate = %hex_address(&delegate),
            actor = %hex_address(&actor),
            valid_to,
            "delegate granted"
        );
        Effect::Changed { seq }
    }

    fn revoke_delegate_as(
        &mut self,
        actor: Address,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Effect {
        let valid_to = now.saturating_sub(backdate_seconds);
        self.delegates.set(identity, (delegate_type, delegate), valid_to);
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::DelegateChanged {
                delegate_type,
                delegate,
                valid_to,
                compromised,
            }],
        );
        debug!(
            identity = %hex_address(&identity),
            delegate = %hex_address(&delegate),
            actor = %hex_address(&actor),
            compromised,
            "delegate revoked"
        );
        Effect::Changed { seq }
    }

    fn set_attribute_as(
        &mut self,
        actor: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Effect {
        let valid_to = now.saturating_add(validity_seconds);
        let key = (keccak256(name), keccak256(value));
        self.attributes.set(identity, key, valid_to);
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::AttributeChanged {
                name: name.to_vec(),
                value: value.to_vec(),
                valid_to,
                compromised: false,
            }],
        );
        debug!(
            identity = %hex_address(&identity),
            actor = %hex_address(&actor),
            valid_to,
            "attribute set"
        );
        Effect::Changed { seq }
    }

    fn revoke_attribute_as(
        &mut self,
        actor: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Effect {
        let valid_to = now.saturating_sub(backdate_seconds);
        let key = (keccak256(name), keccak256(value));
        self.attributes.set(identity, key, valid_to);
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::AttributeChanged {
                name: name.to_vec(),
                value: value.to_vec(),
                valid_to,
                compromised,
            }],
        );
        debug!(
            identity = %hex_address(&identity),
            actor = %hex_address(&actor),
            compromised,
            "attribute revoked"
        );
        Effect::Changed { seq }
    }
}

impl DidRegistryApi for RegistryService {
    fn apply(&mut self, transaction: Transaction) -> Result<Effect, RegistryError> {
        let Transaction {
            caller,
            now,
            operation,
        } = transaction;
        match operation {
            Operation::AddController {
                identity,
                controller,
            } => self.add_controller(caller, identity, controller, now),
            Operation::RemoveController {
                identity,
                controller,
            } => self.remove_controller(caller, identity, controller, now),
            Operation::ChangeController {
                identity,
                controller,
            } => self.change_controller(caller, identity, controller, now),
            Operation::RotateMainController {
                identity,
                controller,
            } => self.rotate_main_controller(caller, identity, controller, now),
            Operation::EnrollNewAndSetMainController {
                identity,
                controller,
            } => self.enroll_new_and_set_main_controller(caller, identity, controller, now),
            Operation::DeactivateAccount { identity } => {
                self.deactivate_account(caller, identity, now)
            }
            Operation::DeactivateControllers { identity } => {
                self.deactivate_controllers(caller, identity, now)
            }
            Operation::EnableKeyRotation {
                identity,
                window_seconds,
            } => self.enable_key_rotation(caller, identity, window_seconds, now),
            Operation::DisableKeyRotation { identity } => {
                self.disable_key_rotation(caller, identity, now)
            }
            Operation::AddDelegate {
                identity,
                delegate_type,
                delegate,
                validity_seconds,
            } => self.add_delegate(caller, identity, delegate_type, delegate, validity_seconds, now),
            Operation::AddDelegateSigned {
                identity,
                signature,
                delegate_type,
                delegate,
                validity_seconds,
            } => self.add_delegate_signed(
                identity,
                signature,
                delegate_type,
                delegate,
                validity_seconds,
                now,
            ),
            Operation::RevokeDelegate {
                identity,
                delegate_type,
                delegate,
                backdate_seconds,
                compromised,
            } => self.revoke_delegate(
                caller,
                identity,
                delegate_type,
                delegate,
                backdate_seconds,
                compromised,
                now,
            ),
            Operation::RevokeDelegateSigned {
                identity,
                signature,
                delegate_type,
                delegate,
                backdate_seconds,
                compromised,
            } => self.revoke_delegate_signed(
                identity,
                signature,
                delegate_type,
                delegate,
                backdate_seconds,
                compromised,
                now,
            ),
            Operation::SetAttribute {
                identity,
                name,
                value,
                validity_seconds,
            } => self.set_attribute(caller, identity, &name, &value, validity_seconds, now),
            Operation::SetAttributeSigned {
                identity,
                signature,
                name,
                value,
                validity_seconds,
            } => self.set_attribute_signed(identity, signature, &name, &value, validity_seconds, now),
            Operation::RevokeAttribute {
                identity,
                name,
                value,
                backdate_seconds,
                compromised,
            } => self.revoke_attribute(
                caller,
                identity,
                &name,
                &value,
                backdate_seconds,
                compromised,
                now,
            ),
            Operation::RevokeAttributeSigned {
                identity,
                signature,
                name,
                value,
                backdate_seconds,
                compromised,
            } => self.revoke_attribute_signed(
                identity,
                signature,
                &name,
                &value,
                backdate_seconds,
                compromised,
                now,
            ),
            Operation::AddAkaIdentifier {
                identity,
                aka_id,
                validity_seconds,
            } => self.add_aka_identifier(caller, identity, &aka_id, validity_seconds, now),
            Operation::RemoveAkaIdentifier { identity, aka_id } => {
                self.remove_aka_identifier(caller, identity, &aka_id, now)
            }
            Operation::Recover {
                identity,
                signature,
                candidate,
            } => self
                .recover(identity, signature, candidate, now)
                .map(Effect::RecoveryVote),
        }
    }

    // ------------------------------------------------------------------
    // Controller management
    // ------------------------------------------------------------------

    fn add_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        self.identities.add_controller(identity, controller)?;
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::ControllerAdded { actor, controller }],
        );
        info!(
            identity = %hex_address(&identity),
            controller = %hex_address(&controller),
            "controller added"
        );
        Ok(Effect::Changed { seq })
    }

    fn remove_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.remove_controller(identity, controller)?;
        let seq = self
            .changelog
            .append(identity, vec![ChangePayload::ControllerRemoved { controller }]);
        info!(
            identity = %hex_address(&identity),
            controller = %hex_address(&controller),
            "controller removed"
        );
        Ok(Effect::Changed { seq })
    }

    fn change_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.change_controller(identity, controller);
        let seq = self
            .changelog
            .append(identity, vec![ChangePayload::ControllerChanged { controller }]);
        info!(
            identity = %hex_address(&identity),
            controller = %hex_address(&controller),
            "main controller changed"
        );
        Ok(Effect::Changed { seq })
    }

    fn rotate_main_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.rotate_main_controller(identity, controller)?;
        let seq = self
            .changelog
            .append(identity, vec![ChangePayload::ControllerChanged { controller }]);
        info!(
            identity = %hex_address(&identity),
            controller = %hex_address(&controller),
            "main controller rotated"
        );
        Ok(Effect::Changed { seq })
    }

    fn enroll_new_and_set_main_controller(
        &mut self,
        caller: Address,
        identity: Address,
        controller: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        self.identities.enroll_new_main_controller(identity, controller)?;
        let seq = self.changelog.append(
            identity,
            vec![
                ChangePayload::ControllerAdded { actor, controller },
                ChangePayload::ControllerChanged { controller },
            ],
        );
        info!(
            identity = %hex_address(&identity),
            controller = %hex_address(&controller),
            "new main controller enrolled"
        );
        Ok(Effect::Changed { seq })
    }

    fn deactivate_account(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.deactivate_account(identity);
        let seq = self
            .changelog
            .append(identity, vec![ChangePayload::AccountDeactivated]);
        info!(identity = %hex_address(&identity), "account deactivated");
        Ok(Effect::Changed { seq })
    }

    fn deactivate_controllers(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        let removed = self.identities.deactivate_controllers(identity) as u32;
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::ControllersDeactivated { removed }],
        );
        info!(
            identity = %hex_address(&identity),
            removed,
            "controllers deactivated"
        );
        Ok(Effect::Changed { seq })
    }

    fn enable_key_rotation(
        &mut self,
        caller: Address,
        identity: Address,
        window_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.enable_key_rotation(
            identity,
            window_seconds,
            self.config.min_key_rotation_seconds,
        )?;
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::KeyRotationEnabled { window_seconds }],
        );
        debug!(identity = %hex_address(&identity), window_seconds, "key rotation enabled");
        Ok(Effect::Changed { seq })
    }

    fn disable_key_rotation(
        &mut self,
        caller: Address,
        identity: Address,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        self.identities.disable_key_rotation(identity)?;
        let seq = self
            .changelog
            .append(identity, vec![ChangePayload::KeyRotationDisabled]);
        debug!(identity = %hex_address(&identity), "key rotation disabled");
        Ok(Effect::Changed { seq })
    }

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
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        Ok(self.grant_delegate_as(actor, identity, delegate_type, delegate, validity_seconds, now))
    }

    fn add_delegate_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.verify_controller_signature(
            identity,
            &signature,
            tags::ADD_DELEGATE,
            now,
            |digest| digest.bytes32(delegate_type).address(delegate).uint(validity_seconds),
        )?;
        let effect =
            self.grant_delegate_as(actor, identity, delegate_type, delegate, validity_seconds, now);
        self.nonces.consume(actor);
        Ok(effect)
    }

    fn revoke_delegate(
        &mut self,
        caller: Address,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        Ok(self.revoke_delegate_as(
            actor,
            identity,
            delegate_type,
            delegate,
            backdate_seconds,
            compromised,
            now,
        ))
    }

    fn revoke_delegate_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        delegate_type: DelegateType,
        delegate: Address,
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.verify_controller_signature(
            identity,
            &signature,
            tags::REVOKE_DELEGATE,
            now,
            |digest| {
                digest
                    .bytes32(delegate_type)
                    .address(delegate)
                    .uint(backdate_seconds)
                    .boolean(compromised)
            },
        )?;
        let effect = self.revoke_delegate_as(
            actor,
            identity,
            delegate_type,
            delegate,
            backdate_seconds,
            compromised,
            now,
        );
        self.nonces.consume(actor);
        Ok(effect)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn set_attribute(
        &mut self,
        caller: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        Ok(self.set_attribute_as(actor, identity, name, value, validity_seconds, now))
    }

    fn set_attribute_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        name: &[u8],
        value: &[u8],
        validity_seconds: u64,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.verify_controller_signature(
            identity,
            &signature,
            tags::SET_ATTRIBUTE,
            now,
            |digest| digest.content(name).content(value).uint(validity_seconds),
        )?;
        let effect = self.set_attribute_as(actor, identity, name, value, validity_seconds, now);
        self.nonces.consume(actor);
        Ok(effect)
    }

    fn revoke_attribute(
        &mut self,
        caller: Address,
        identity: Address,
        name: &[u8],
        value: &[u8],
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.authorize(identity, caller, now)?;
        Ok(self.revoke_attribute_as(
            actor,
            identity,
            name,
            value,
            backdate_seconds,
            compromised,
            now,
        ))
    }

    fn revoke_attribute_signed(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        name: &[u8],
        value: &[u8],
        backdate_seconds: u64,
        compromised: bool,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        let actor = self.verify_controller_signature(
            identity,
            &signature,
            tags::REVOKE_ATTRIBUTE,
            now,
            |digest| {
                digest
                    .content(name)
                    .content(value)
                    .uint(backdate_seconds)
                    .boolean(compromised)
            },
        )?;
        let effect = self.revoke_attribute_as(
            actor,
            identity,
            name,
            value,
            backdate_seconds,
            compromised,
            now,
        );
        self.nonces.consume(actor);
        Ok(effect)
    }

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
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        let valid_to = now.saturating_add(validity_seconds);
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::AkaChanged {
                aka_id: aka_id.to_string(),
                valid_to,
            }],
        );
        debug!(identity = %hex_address(&identity), aka_id, "aka identifier added");
        Ok(Effect::Changed { seq })
    }

    fn remove_aka_identifier(
        &mut self,
        caller: Address,
        identity: Address,
        aka_id: &str,
        now: UnixSeconds,
    ) -> Result<Effect, RegistryError> {
        self.identities.ensure_mutable(&identity)?;
        self.authorize(identity, caller, now)?;
        let seq = self.changelog.append(
            identity,
            vec![ChangePayload::AkaChanged {
                aka_id: aka_id.to_string(),
                valid_to: 0,
            }],
        );
        debug!(identity = %hex_address(&identity), aka_id, "aka identifier removed");
        Ok(Effect::Changed { seq })
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    fn recover(
        &mut self,
        identity: Address,
        signature: EcdsaSignature,
        candidate: Address,
        now: UnixSeconds,
    ) -> Result<RecoveryOutcome, RegistryError> {
        self.identities.ensure_mutable(&identity)?;

        let controllers = self.identities.controllers(&identity);
        let required = self.config.minimum_controllers;
        if (controllers.len() as u32) < required {
            return Err(RegistryError::MinimumControllersNotAchieved {
                required,
                actual: controllers.len() as u32,
            });
        }

        self.recovery
            .expire_stale_round(identity, now, self.config.recovery_reset_seconds);
        if let Some(window_ends) = self.recovery.throttled_until(
            &identity,
            self.config.max_recovery_attempts,
            self.config.recovery_reset_seconds,
        ) {
            return Err(RegistryError::RecoveryAttemptsExhausted { window_ends });
        }

        // The distilled interface no longer names the voter, so resolve it
        // by trial verification against each registered backup controller's
        // current nonce. Structural signature failures do not depend on the
        // trial nonce and abort immediately.
        let main = self.identities.effective_controller(identity, now);
        let mut voter = None;
        for backup in controllers.iter().filter(|c| **c != main) {
            let digest = MetaTxDigest::new(
                self.config.registry_id,
                self.nonces.current(backup),
                identity,
                tags::RECOVER,
            )
            .address(candidate)
            .finish();
            match recover_address(&digest, &signature) {
                Ok(signer) if signer == *backup => {
                    voter = Some(*backup);
                    break;
                }
                Ok(_) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let Some(voter) = voter else {
            // Well-formed signature, but not from a registered backup
            // controller for any live nonce: the vote is simply not added.
            debug!(identity = %hex_address(&identity), "recovery vote not added: unknown signer");
            return Ok(RecoveryOutcome {
                vote_added: false,
                main_controller_changed: false,
                seq: None,
            });
        };

        let (vote_added, tally) = self.recovery.cast(identity, voter, candidate, now);
        self.nonces.consume(voter);
        debug!(
            identity = %hex_address(&identity),
            voter = %hex_address(&voter),
            candidate = %hex_address(&candidate),
            tally,
            "recovery vote cast"
        );

        if tally < required {
            return Ok(RecoveryOutcome {
                vote_added,
                main_controller_changed: false,
                seq: None,
            });
        }

        self.recovery.complete(identity);
        self.identities.seat_recovered_controller(identity, candidate);
        let seq = self.changelog.append(
            identity,
            vec![
                ChangePayload::RecoveryExecuted {
                    new_main_controller: candidate,
                    votes: tally,
                },
                ChangePayload::ControllerChanged {
                    controller: candidate,
                },
            ],
        );
        info!(
            identity = %hex_address(&identity),
            candidate = %hex_address(&candidate),
            votes = tally,
            "recovery quorum reached: main controller replaced"
        );
        Ok(RecoveryOutcome {
            vote_added,
            main_controller_changed: true,
            seq: Some(seq),
        })
    }

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    fn identity_controller(&self, identity: Address, now: UnixSeconds) -> Address {
        self.identities.effective_controller(identity, now)
    }

    fn get_controllers(&self, identity: Address) -> Vec<Address> {
        self.identities.controllers(&identity)
    }

    fn are_controllers_deactivated(&self, identity: Address) -> bool {
        self.identities.are_controllers_deactivated(&identity)
    }

    fn is_account_deactivated(&self, identity: Address) -> bool {
        self.identities.is_account_deactivated(&identity)
    }

    fn valid_delegate(
        &self,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
        now: UnixSeconds,
    ) -> bool {
        self.delegates
            .is_valid(identity, &(delegate_type, delegate), now)
    }

    fn delegates(
        &self,
        identity: Address,
        delegate_type: DelegateType,
        delegate: Address,
    ) -> UnixSeconds {
        self.delegates
            .valid_until(identity, &(delegate_type, delegate))
    }

    fn attributes(&self, identity: Address, name_hash: Hash, value_hash: Hash) -> UnixSeconds {
        self.attributes.valid_until(identity, &(name_hash, value_hash))
    }

    fn nonce(&self, signer: Address) -> u64 {
        self.nonces.current(&signer)
    }

    fn changed(&self, identity: Address) -> u64 {
        self.changelog.changed(&identity)
    }

    fn changes_at(&self, seq: u64) -> &[ChangeRecord] {
        self.changelog.records_at(seq)
    }

    fn min_key_rotation_time(&self) -> u64 {
        self.config.min_key_rotation_seconds
    }
}

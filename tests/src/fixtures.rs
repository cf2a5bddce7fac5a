//! # Test Fixtures
//!
//! Registry construction and meta-transaction signing helpers shared by the
//! scenario tests. Signing mirrors what a wallet does: read the signer's
//! current nonce from the registry, build the canonical digest, sign it.

use did_registry::{DidRegistryApi, RegistryConfig, RegistryService};
use registry_crypto::signing::{generate_keypair, sign_digest, Keypair};
use registry_crypto::{EcdsaSignature, MetaTxDigest};
use registry_types::{Address, DelegateType};

pub const NOW: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;
pub const REGISTRY_ID: Address = [0xEE; 20];

/// Opt-in log capture: `RUST_LOG=did_registry=debug cargo test -p registry-tests`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Construction parameters used across the scenario tests, matching a
/// small deployment: 1h key-rotation floor, quorum of 3, 2 recoveries per
/// 10-second reset window.
pub fn deploy() -> RegistryService {
    RegistryService::new(RegistryConfig {
        registry_id: REGISTRY_ID,
        min_key_rotation_seconds: 3600,
        minimum_controllers: 3,
        max_recovery_attempts: 2,
        recovery_reset_seconds: 10,
    })
}

/// A deterministic throwaway address for tests that never need to sign.
pub fn addr(byte: u8) -> Address {
    [byte; 20]
}

/// A fresh signing account.
pub fn account() -> Keypair {
    generate_keypair()
}

pub fn sign_add_delegate(
    registry: &RegistryService,
    signer: &Keypair,
    identity: Address,
    delegate_type: DelegateType,
    delegate: Address,
    validity_seconds: u64,
) -> EcdsaSignature {
    let digest = MetaTxDigest::new(
        registry.config().registry_id,
        registry.nonce(signer.address),
        identity,
        "addDelegate",
    )
    .bytes32(delegate_type)
    .address(delegate)
    .uint(validity_seconds)
    .finish();
    sign_digest(&digest, &signer.signing_key)
}

pub fn sign_revoke_delegate(
    registry: &RegistryService,
    signer: &Keypair,
    identity: Address,
    delegate_type: DelegateType,
    delegate: Address,
    backdate_seconds: u64,
    compromised: bool,
) -> EcdsaSignature {
    let digest = MetaTxDigest::new(
        registry.config().registry_id,
        registry.nonce(signer.address),
        identity,
        "revokeDelegate",
    )
    .bytes32(delegate_type)
    .address(delegate)
    .uint(backdate_seconds)
    .boolean(compromised)
    .finish();
    sign_digest(&digest, &signer.signing_key)
}

pub fn sign_set_attribute(
    registry: &RegistryService,
    signer: &Keypair,
    identity: Address,
    name: &[u8],
    value: &[u8],
    validity_seconds: u64,
) -> EcdsaSignature {
    let digest = MetaTxDigest::new(
        registry.config().registry_id,
        registry.nonce(signer.address),
        identity,
        "setAttribute",
    )
    .content(name)
    .content(value)
    .uint(validity_seconds)
    .finish();
    sign_digest(&digest, &signer.signing_key)
}

pub fn sign_revoke_attribute(
    registry: &RegistryService,
    signer: &Keypair,
    identity: Address,
    name: &[u8],
    value: &[u8],
    backdate_seconds: u64,
    compromised: bool,
) -> EcdsaSignature {
    let digest = MetaTxDigest::new(
        registry.config().registry_id,
        registry.nonce(signer.address),
        identity,
        "revokeAttribute",
    )
    .content(name)
    .content(value)
    .uint(backdate_seconds)
    .boolean(compromised)
    .finish();
    sign_digest(&digest, &signer.signing_key)
}

pub fn sign_recover(
    registry: &RegistryService,
    signer: &Keypair,
    identity: Address,
    candidate: Address,
) -> EcdsaSignature {
    let digest = MetaTxDigest::new(
        registry.config().registry_id,
        registry.nonce(signer.address),
        identity,
        "recover",
    )
    .address(candidate)
    .finish();
    sign_digest(&digest, &signer.signing_key)
}

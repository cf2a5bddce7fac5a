//! # Registry Configuration
//!
//! All tunables are fixed at construction; there is no ambient global
//! configuration and no way to change these after the registry exists.

use registry_types::{Address, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};

/// Smallest key-rotation window an identity may enable.
pub const DEFAULT_MIN_KEY_ROTATION_SECONDS: u64 = 3600;

/// Distinct backup-controller votes required to elect a new main controller.
pub const DEFAULT_MINIMUM_CONTROLLERS: u32 = 3;

/// Completed recoveries allowed inside one reset window.
pub const DEFAULT_MAX_RECOVERY_ATTEMPTS: u32 = 2;

/// Seconds after which a recovery round (votes and attempt count) expires.
pub const DEFAULT_RECOVERY_RESET_SECONDS: u64 = 3600;

/// Immutable per-instance configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// This registry instance's own identifier. Mixed into every signed
    /// digest so a signature for one deployment cannot authorize another.
    pub registry_id: Address,
    /// Lower bound accepted by `enableKeyRotation`.
    pub min_key_rotation_seconds: u64,
    /// Quorum threshold for recovery voting. An explicit constant, never
    /// derived from an identity's controller-set size.
    pub minimum_controllers: u32,
    /// Completed recoveries allowed per identity inside one reset window.
    pub max_recovery_attempts: u32,
    /// Length of the recovery reset window.
    pub recovery_reset_seconds: u64,
}

impl RegistryConfig {
    /// Configuration with the default limits for the given instance id.
    pub fn new(registry_id: Address) -> Self {
        Self {
            registry_id,
            ..Default::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_id: ZERO_ADDRESS,
            min_key_rotation_seconds: DEFAULT_MIN_KEY_ROTATION_SECONDS,
            minimum_controllers: DEFAULT_MINIMUM_CONTROLLERS,
            max_recovery_attempts: DEFAULT_MAX_RECOVERY_ATTEMPTS,
            recovery_reset_seconds: DEFAULT_RECOVERY_RESET_SECONDS,
        }
    }
}

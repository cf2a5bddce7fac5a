use registry_crypto::SignatureError;
use registry_types::Address;
use thiserror::Error;

/// Domain errors. Every variant aborts the whole operation with no state
/// change; retries are a caller concern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("caller is not the identity's current controller")]
    NotAuthorized,

    #[error("controller already registered: {0:?}")]
    ControllerAlreadyExists(Address),

    #[error("controller not registered: {0:?}")]
    ControllerNotRegistered(Address),

    #[error("controller is the current main controller: {0:?}")]
    ControllerIsMain(Address),

    #[error("account was deactivated")]
    AccountWasDeactivated,

    #[error("controllers were deactivated")]
    ControllersDeactivated,

    #[error("key rotation already enabled")]
    KeyRotationAlreadyEnabled,

    #[error("key rotation already disabled")]
    KeyRotationAlreadyDisabled,

    #[error("key rotation window too short: requested {requested}s, minimum {minimum}s")]
    KeyRotationWindowTooShort { requested: u64, minimum: u64 },

    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("identity must have the minimum of controllers: has {actual}, requires {required}")]
    MinimumControllersNotAchieved { required: u32, actual: u32 },

    #[error("recovery attempts exhausted until {window_ends}")]
    RecoveryAttemptsExhausted { window_ends: u64 },
}

//! # did-registry
//!
//! The authoritative state machine of the DID identity registry.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): pure state — controller sets, TTL grant
//!   maps, nonces, recovery rounds, the append-only change log. No I/O.
//! - **Events Layer** (`events/`): the structured change records appended on
//!   every mutation, consumed off-process to reconstruct identity history.
//! - **Ports Layer** (`ports/`): the inbound [`DidRegistryApi`] trait.
//! - **Service Layer** (`service.rs`): wires authorization, signature
//!   verification, domain mutation, and change-record emission together.
//!
//! ## Execution Model
//!
//! The registry has no threads, clocks, or suspension points. The hosting
//! environment serializes operations and supplies the current time with each
//! call; applying the same operations in the same order always produces the
//! same state. Every operation either fully applies or fails with no state
//! change.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::config::RegistryConfig;
pub use domain::errors::RegistryError;
pub use domain::operations::{Effect, Operation, RecoveryOutcome, Transaction};
pub use events::{ChangePayload, ChangeRecord};
pub use ports::inbound::DidRegistryApi;
pub use service::RegistryService;

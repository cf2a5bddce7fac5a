//! # Change Records
//!
//! Structured records emitted on every mutation, the registry's contract
//! with off-process history consumers.

pub mod payloads;

pub use payloads::{ChangePayload, ChangeRecord};

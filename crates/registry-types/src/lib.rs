//! # registry-types
//!
//! Shared primitive types for the DID identity registry workspace.
//!
//! Every crate in the workspace speaks in terms of these aliases so that the
//! wire-level representation (20-byte addresses, 32-byte hashes) is defined
//! in exactly one place.

pub mod entities;

pub use entities::{
    delegate_type, hex_address, Address, DelegateType, Hash, UnixSeconds, ZERO_ADDRESS,
};

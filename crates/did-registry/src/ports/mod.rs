//! # Ports Layer
//!
//! Trait definitions for the registry's interfaces.

pub mod inbound;

pub use inbound::DidRegistryApi;

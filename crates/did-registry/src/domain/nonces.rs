//! # Replay Nonces
//!
//! One monotonically increasing counter per signer. A signed operation's
//! digest binds the signer's current nonce; the counter advances exactly
//! once per successfully verified signed operation, and only after every
//! other validation has passed — a rejected operation must never consume a
//! nonce, or an attacker could burn a victim's counter with garbage
//! signatures.

use std::collections::HashMap;

use registry_types::Address;

#[derive(Debug, Default)]
pub struct NonceStore {
    nonces: HashMap<Address, u64>,
}

impl NonceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The nonce the signer's next signature must bind.
    pub fn current(&self, signer: &Address) -> u64 {
        self.nonces.get(signer).copied().unwrap_or(0)
    }

    /// Advance the signer's counter. Call only after the signed operation
    /// has fully validated.
    pub fn consume(&mut self, signer: Address) {
        *self.nonces.entry(signer).or_insert(0) += 1;
    }
}

//! # TTL Grant Stores
//!
//! Delegates and attributes share one storage pattern: a time-bounded grant
//! keyed per identity, valid while `now < valid_until`. Revocation writes a
//! past horizon instead of deleting, so expired grants stay queryable.
//!
//! The two keyspaces are kept in separate store instances: a delegate is
//! `(delegateType, delegateAddress)`, an attribute is
//! `(keccak(name), keccak(value))`.

use std::collections::HashMap;
use std::hash::Hash as StdHash;

use registry_types::{Address, DelegateType, Hash, UnixSeconds};

/// Delegate grant key: capability type plus delegated address.
pub type DelegateKey = (DelegateType, Address);

/// Attribute grant key: content hashes of name and value.
pub type AttributeKey = (Hash, Hash);

pub type DelegateGrants = TtlGrants<DelegateKey>;
pub type AttributeGrants = TtlGrants<AttributeKey>;

/// Generic TTL-keyed grant map.
#[derive(Debug)]
pub struct TtlGrants<K> {
    grants: HashMap<(Address, K), UnixSeconds>,
}

impl<K> Default for TtlGrants<K> {
    fn default() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }
}

impl<K: Eq + StdHash + Clone> TtlGrants<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the grant's validity horizon. Re-granting an existing key
    /// simply moves the horizon; revocation writes a horizon in the past.
    pub fn set(&mut self, identity: Address, key: K, valid_until: UnixSeconds) {
        self.grants.insert((identity, key), valid_until);
    }

    /// The stored horizon, or 0 for a grant that never existed.
    pub fn valid_until(&self, identity: Address, key: &K) -> UnixSeconds {
        self.grants
            .get(&(identity, key.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// A grant is live strictly before its horizon.
    pub fn is_valid(&self, identity: Address, key: &K, now: UnixSeconds) -> bool {
        now < self.valid_until(identity, key)
    }
}

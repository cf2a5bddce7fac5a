//! # Delegate and Attribute Grant Scenarios
//!
//! TTL semantics of the two grant keyspaces through the direct-call
//! authorization channel.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use did_registry::{ChangePayload, DidRegistryApi, Effect};
    use registry_crypto::keccak256;
    use registry_types::delegate_type;

    #[test]
    fn adds_a_verification_method() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let name = b"asse/abc/mnp/xyz";
        let value = b"someValue";

        registry
            .set_attribute(identity, identity, name, value, DAY, NOW)
            .unwrap();

        let expires = registry.attributes(identity, keccak256(name), keccak256(value));
        assert!(expires > NOW);
        assert_eq!(expires, NOW + DAY);
    }

    #[test]
    fn revokes_a_verification_method() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let name = b"auth/abc/mnp/xyz";
        let value = b"someValue";
        let backdate = 32_000;

        registry
            .revoke_attribute(identity, identity, name, value, backdate, true, NOW)
            .unwrap();

        let expires = registry.attributes(identity, keccak256(name), keccak256(value));
        assert!(expires < NOW);
        assert_eq!(expires, NOW - backdate);
    }

    #[test]
    fn attribute_records_carry_raw_bytes_and_the_compromised_flag() {
        let mut registry = deploy();
        let identity = addr(0x01);

        let Effect::Changed { seq } = registry
            .revoke_attribute(identity, identity, b"name", b"value", 0, true, NOW)
            .unwrap()
        else {
            panic!("expected a state change");
        };

        let records = registry.changes_at(seq);
        assert_eq!(records.len(), 1);
        match &records[0].payload {
            ChangePayload::AttributeChanged {
                name,
                value,
                valid_to,
                compromised,
            } => {
                assert_eq!(name, b"name");
                assert_eq!(value, b"value");
                assert_eq!(*valid_to, NOW);
                assert!(*compromised);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn grants_an_authentication_delegate() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let delegate = addr(0x02);
        let sig_auth = delegate_type("sigAuth");

        registry
            .add_delegate(identity, identity, sig_auth, delegate, DAY, NOW)
            .unwrap();

        assert!(registry.valid_delegate(identity, sig_auth, delegate, NOW));
        let valid_until = registry.delegates(identity, sig_auth, delegate);
        assert!(valid_until > NOW + DAY / 2);
    }

    #[test]
    fn revoked_delegate_expires_immediately() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let delegate = addr(0x02);
        let sig_auth = delegate_type("sigAuth");

        registry
            .add_delegate(identity, identity, sig_auth, delegate, DAY, NOW)
            .unwrap();
        assert!(registry.valid_delegate(identity, sig_auth, delegate, NOW));

        registry
            .revoke_delegate(identity, identity, sig_auth, delegate, DAY, true, NOW)
            .unwrap();
        assert!(!registry.valid_delegate(identity, sig_auth, delegate, NOW));
        assert!(registry.delegates(identity, sig_auth, delegate) < NOW - DAY / 2);
    }

    #[test]
    fn grants_expire_lazily_with_time() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let delegate = addr(0x02);
        let veri_key = delegate_type("veriKey");

        registry
            .add_delegate(identity, identity, veri_key, delegate, 100, NOW)
            .unwrap();

        assert!(registry.valid_delegate(identity, veri_key, delegate, NOW + 99));
        // The horizon itself is already expired; no revocation needed.
        assert!(!registry.valid_delegate(identity, veri_key, delegate, NOW + 100));
    }

    #[test]
    fn regrant_extends_the_horizon() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let delegate = addr(0x02);
        let sig_auth = delegate_type("sigAuth");

        registry
            .add_delegate(identity, identity, sig_auth, delegate, 100, NOW)
            .unwrap();
        registry
            .add_delegate(identity, identity, sig_auth, delegate, DAY, NOW)
            .unwrap();
        assert_eq!(registry.delegates(identity, sig_auth, delegate), NOW + DAY);
    }

    #[test]
    fn delegate_keyspace_distinguishes_types() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let delegate = addr(0x02);

        registry
            .add_delegate(identity, identity, delegate_type("sigAuth"), delegate, DAY, NOW)
            .unwrap();

        assert!(registry.valid_delegate(identity, delegate_type("sigAuth"), delegate, NOW));
        assert!(!registry.valid_delegate(identity, delegate_type("veriKey"), delegate, NOW));
    }

    #[test]
    fn unknown_grants_read_as_expired_at_zero() {
        let registry = deploy();
        let identity = addr(0x01);
        assert_eq!(
            registry.delegates(identity, delegate_type("sigAuth"), addr(0x02)),
            0
        );
        assert_eq!(
            registry.attributes(identity, keccak256(b"a"), keccak256(b"b")),
            0
        );
    }
}

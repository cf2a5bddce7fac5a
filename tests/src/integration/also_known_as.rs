//! # AlsoKnownAs Scenarios
//!
//! Alternate identifiers are never stored directly; consumers rebuild the
//! list by walking the change log backward from `changed(identity)`.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use did_registry::{ChangePayload, DidRegistryApi, Effect, RegistryError};

    /// Pull the AKA id out of the records at one change pointer.
    fn aka_at(registry: &did_registry::RegistryService, seq: u64) -> (String, u64) {
        let records = registry.changes_at(seq);
        assert_eq!(records.len(), 1);
        match &records[0].payload {
            ChangePayload::AkaChanged { aka_id, .. } => {
                (aka_id.clone(), records[0].previous_change)
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn adds_an_aka_identifier() {
        let mut registry = deploy();
        let identity = addr(0x01);

        let Effect::Changed { seq } = registry
            .add_aka_identifier(identity, identity, "did:abc:mnp", DAY, NOW)
            .unwrap()
        else {
            panic!("expected a state change");
        };

        let records = registry.changes_at(seq);
        assert!(matches!(
            &records[0].payload,
            ChangePayload::AkaChanged { aka_id, valid_to }
                if aka_id == "did:abc:mnp" && *valid_to == NOW + DAY
        ));
        assert_eq!(registry.changed(identity), seq);
    }

    #[test]
    fn resolves_all_registered_identifiers_by_walking_backward() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let aka_ids = ["id1", "id2", "id3", "id4"];

        for aka_id in aka_ids {
            registry
                .add_aka_identifier(identity, identity, aka_id, DAY, NOW)
                .unwrap();
        }

        let mut resolved = Vec::new();
        let mut cursor = registry.changed(identity);
        while cursor > 0 {
            let (aka_id, previous) = aka_at(&registry, cursor);
            resolved.push(aka_id);
            cursor = previous;
        }

        // Reverse insertion order, terminating at the zero sentinel.
        assert_eq!(resolved, vec!["id4", "id3", "id2", "id1"]);
    }

    #[test]
    fn removal_emits_a_record_with_a_zero_horizon() {
        let mut registry = deploy();
        let identity = addr(0x01);

        registry
            .add_aka_identifier(identity, identity, "did:abc:mnp", DAY, NOW)
            .unwrap();
        let Effect::Changed { seq } = registry
            .remove_aka_identifier(identity, identity, "did:abc:mnp", NOW)
            .unwrap()
        else {
            panic!("expected a state change");
        };

        let (aka_id, previous) = aka_at(&registry, seq);
        assert_eq!(aka_id, "did:abc:mnp");
        assert_eq!(previous, seq - 1);
        assert!(matches!(
            registry.changes_at(seq)[0].payload,
            ChangePayload::AkaChanged { valid_to: 0, .. }
        ));
    }

    #[test]
    fn aka_writes_require_authorization() {
        let mut registry = deploy();
        let identity = addr(0x01);

        let err = registry
            .add_aka_identifier(addr(0x0A), identity, "id1", DAY, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::NotAuthorized);
        assert_eq!(registry.changed(identity), 0);
    }

    #[test]
    fn records_serialize_for_offchain_indexers() {
        let mut registry = deploy();
        let identity = addr(0x01);
        registry
            .add_aka_identifier(identity, identity, "did:abc:mnp", DAY, NOW)
            .unwrap();

        let records = registry.changes_at(registry.changed(identity));
        let json = serde_json::to_string(records).unwrap();
        assert!(json.contains("did:abc:mnp"));
        assert!(json.contains("previous_change"));
    }
}

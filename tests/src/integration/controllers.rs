//! # Controller Lifecycle Scenarios
//!
//! Switching, enrolling, removing, and deactivating controllers, plus the
//! key-rotation toggles.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use did_registry::{ChangePayload, DidRegistryApi, Effect, RegistryError};
    use registry_types::ZERO_ADDRESS;

    #[test]
    fn switches_main_controller_to_a_registered_backup() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let backup = addr(0x02);

        registry
            .add_controller(identity, identity, backup, NOW)
            .unwrap();
        registry
            .rotate_main_controller(identity, identity, backup, NOW)
            .unwrap();

        assert_eq!(registry.identity_controller(identity, NOW), backup);
    }

    #[test]
    fn rotate_rejects_an_unregistered_controller() {
        let mut registry = deploy();
        let identity = addr(0x01);

        let err = registry
            .rotate_main_controller(identity, identity, addr(0x09), NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::ControllerNotRegistered(addr(0x09)));
    }

    #[test]
    fn unauthorized_caller_cannot_add_a_controller() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let stranger = addr(0x0A);

        let err = registry
            .add_controller(stranger, identity, addr(0x02), NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::NotAuthorized);
        assert!(registry.get_controllers(identity).is_empty());
    }

    #[test]
    fn duplicate_controllers_are_rejected_without_side_effects() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let backup = addr(0x02);

        // A fresh identity is implicitly its own controller, so adding
        // itself is already a duplicate.
        assert_eq!(
            registry.add_controller(identity, identity, identity, NOW),
            Err(RegistryError::ControllerAlreadyExists(identity))
        );

        registry
            .add_controller(identity, identity, backup, NOW)
            .unwrap();
        assert_eq!(registry.get_controllers(identity).len(), 2);

        assert_eq!(
            registry.add_controller(identity, identity, backup, NOW),
            Err(RegistryError::ControllerAlreadyExists(backup))
        );
        assert_eq!(registry.get_controllers(identity).len(), 2);
    }

    #[test]
    fn change_controller_registers_and_promotes_in_one_step() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let fresh = addr(0x03);

        registry
            .change_controller(identity, identity, fresh, NOW)
            .unwrap();
        assert_eq!(registry.identity_controller(identity, NOW), fresh);
        assert!(registry.get_controllers(identity).contains(&fresh));
    }

    #[test]
    fn enrolls_a_new_account_as_main_controller() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let enrolled = addr(0x02);

        let effect = registry
            .enroll_new_and_set_main_controller(identity, identity, enrolled, NOW)
            .unwrap();
        let Effect::Changed { seq } = effect else {
            panic!("expected a state change");
        };

        // One operation, two records: added then changed.
        let records = registry.changes_at(seq);
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[0].payload,
            ChangePayload::ControllerAdded { controller, .. } if controller == enrolled
        ));
        assert!(matches!(
            records[1].payload,
            ChangePayload::ControllerChanged { controller } if controller == enrolled
        ));

        assert_eq!(registry.identity_controller(identity, NOW), enrolled);
        let controllers = registry.get_controllers(identity);
        assert_eq!(controllers.len(), 2);
        assert!(controllers.contains(&enrolled));
    }

    #[test]
    fn enrolling_an_existing_controller_fails() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let enrolled = addr(0x02);

        registry
            .enroll_new_and_set_main_controller(identity, identity, enrolled, NOW)
            .unwrap();
        let err = registry
            .enroll_new_and_set_main_controller(enrolled, identity, identity, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::ControllerAlreadyExists(identity));
    }

    #[test]
    fn removing_a_backup_controller() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let backup = addr(0x02);

        registry
            .add_controller(identity, identity, backup, NOW)
            .unwrap();
        registry
            .remove_controller(identity, identity, backup, NOW)
            .unwrap();
        assert_eq!(registry.get_controllers(identity), vec![identity]);

        // The main controller itself cannot be removed.
        let err = registry
            .remove_controller(identity, identity, identity, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::ControllerIsMain(identity));
    }

    #[test]
    fn deactivated_account_is_terminal() {
        let mut registry = deploy();
        let identity = addr(0x01);

        registry.deactivate_account(identity, identity, NOW).unwrap();
        assert_eq!(registry.identity_controller(identity, NOW), ZERO_ADDRESS);
        assert!(registry.is_account_deactivated(identity));

        // Nothing mutates a dead identity, enrollment included.
        let err = registry
            .enroll_new_and_set_main_controller(identity, identity, identity, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::AccountWasDeactivated);
        let err = registry
            .deactivate_account(identity, identity, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::AccountWasDeactivated);
    }

    #[test]
    fn controller_deactivation_clears_the_set_but_keeps_the_account() {
        let mut registry = deploy();
        let identity = addr(0x01);
        registry
            .add_controller(identity, identity, addr(0x02), NOW)
            .unwrap();

        registry
            .deactivate_controllers(identity, identity, NOW)
            .unwrap();

        assert!(registry.get_controllers(identity).is_empty());
        assert!(registry.are_controllers_deactivated(identity));
        assert!(!registry.is_account_deactivated(identity));

        // Attribute writes are blocked by the softer terminal state.
        let err = registry
            .set_attribute(identity, identity, b"name", b"value", DAY, NOW)
            .unwrap_err();
        assert_eq!(err, RegistryError::ControllersDeactivated);
    }

    #[test]
    fn key_rotation_toggles_reject_redundant_transitions() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let window = registry.min_key_rotation_time();

        assert_eq!(
            registry.disable_key_rotation(identity, identity, NOW),
            Err(RegistryError::KeyRotationAlreadyDisabled)
        );

        registry
            .enable_key_rotation(identity, identity, window, NOW)
            .unwrap();
        assert_eq!(
            registry.enable_key_rotation(identity, identity, window, NOW),
            Err(RegistryError::KeyRotationAlreadyEnabled)
        );

        registry.disable_key_rotation(identity, identity, NOW).unwrap();
    }

    #[test]
    fn key_rotation_window_has_a_floor() {
        let mut registry = deploy();
        let identity = addr(0x01);
        let minimum = registry.min_key_rotation_time();

        let err = registry
            .enable_key_rotation(identity, identity, minimum - 1, NOW)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::KeyRotationWindowTooShort {
                requested: minimum - 1,
                minimum,
            }
        );
    }

    #[test]
    fn enabled_rotation_moves_authority_through_the_set() {
        let mut registry = deploy();
        let identity = addr(0x01);
        registry
            .add_controller(identity, identity, addr(0x02), NOW)
            .unwrap();
        registry
            .add_controller(identity, identity, addr(0x03), NOW)
            .unwrap();
        let window = registry.min_key_rotation_time();
        registry
            .enable_key_rotation(identity, identity, window, NOW)
            .unwrap();

        let set = registry.get_controllers(identity);
        // Whatever the period picks, it is always a registered controller,
        // and the pick is stable within one window.
        let base = (NOW / window) * window;
        for period in 0..8u64 {
            let t = base + period * window;
            let picked = registry.identity_controller(identity, t);
            assert!(set.contains(&picked));
            assert_eq!(picked, registry.identity_controller(identity, t + window - 1));
        }
    }
}

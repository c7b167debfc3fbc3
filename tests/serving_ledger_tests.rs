mod common;

use common::setup_test_env;
use refectory_core::{
    core::services::ServiceError,
    core::RegistryManager,
    domain::{MealKind, NewSession, TargetServed},
    registry::ReservationDraft,
};

const DATE: &str = "2025-05-10";

fn seeded_manager() -> RegistryManager {
    let mut manager = setup_test_env();
    {
        let registry = manager.registry_mut();
        let group = registry.add_group("1ºA").id();
        for (code, name) in [
            ("IQ3000000001", "Ana Souza"),
            ("IQ3000000002", "Bruno Lima"),
            ("IQ3000000003", "Carla Nunes"),
        ] {
            let id = registry.add_student(code, name).id();
            registry.assign_group(id, group);
            registry.add_reservation(ReservationDraft {
                student_id: id,
                dish: Some("Bolo".into()),
                date: DATE.into(),
                meal: MealKind::Snack,
                canceled: false,
            });
        }
    }
    manager
        .start_session(NewSession {
            meal: MealKind::Snack,
            date: DATE.into(),
            time: "09:30".into(),
            period: String::new(),
            groups: vec!["1ºA".into()],
            snack_name: None,
        })
        .expect("start session");
    manager
}

#[test]
fn double_mark_is_rejected_and_ledger_grows_once() {
    let mut manager = seeded_manager();
    assert!(manager.mark_served("IQ3000000001").is_ok());
    let err = manager.mark_served("IQ3000000001").unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyServed(_)));
    assert!(err.is_expected());
    assert_eq!(manager.served_rows().unwrap().len(), 1);
}

#[test]
fn unmark_restores_the_served_set_exactly() {
    let mut manager = seeded_manager();
    manager.mark_served("IQ3000000001").unwrap();
    manager.mark_served("IQ3000000002").unwrap();
    manager.unmark_served("IQ3000000001").unwrap();

    let rows = manager.served_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "IQ3000000002");

    let err = manager.unmark_served("IQ3000000001").unwrap_err();
    assert!(matches!(err, ServiceError::NotServed(_)));
}

#[test]
fn remaining_complements_the_served_set() {
    let mut manager = seeded_manager();
    let total = manager.eligible().unwrap().len();
    manager.mark_served("IQ3000000002").unwrap();

    let remaining = manager.eligible_remaining().unwrap();
    let served = manager.served_rows().unwrap();
    assert_eq!(remaining.len() + served.len(), total);
}

#[test]
fn unknown_code_is_an_expected_failure() {
    let mut manager = seeded_manager();
    let err = manager.mark_served("IQ3000999999").unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(_)));
    assert!(manager.served_rows().unwrap().is_empty());
}

#[test]
fn reconcile_converges_and_is_idempotent() {
    let mut manager = seeded_manager();
    manager.mark_served("IQ3000000001").unwrap();
    manager.mark_served("IQ3000000002").unwrap();

    let target = vec![
        TargetServed::at("IQ3000000002", "09:32:00"),
        TargetServed::at("IQ3000000003", "09:40:00"),
    ];
    let first = manager.reconcile(&target).unwrap();
    assert_eq!((first.removed, first.inserted, first.skipped), (1, 1, 0));

    let second = manager.reconcile(&target).unwrap();
    assert_eq!((second.removed, second.inserted, second.skipped), (0, 0, 0));

    let mut codes: Vec<String> = manager
        .served_rows()
        .unwrap()
        .into_iter()
        .map(|row| row.code)
        .collect();
    codes.sort();
    assert_eq!(codes, vec!["IQ3000000002", "IQ3000000003"]);
}

#[test]
fn reconcile_counts_unknown_snapshot_codes() {
    let mut manager = seeded_manager();
    let target = vec![
        TargetServed::new("IQ3000000001"),
        TargetServed::new("IQ3000999999"),
    ];
    let outcome = manager.reconcile(&target).unwrap();
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(manager.served_rows().unwrap().len(), 1);
}

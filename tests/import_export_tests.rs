mod common;

use common::setup_test_env;
use refectory_core::{
    core::services::export::EXPORT_HEADER,
    domain::{MealKind, NewSession},
};

fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn spreadsheet_shaped_import_feeds_a_serving_session() {
    let mut manager = setup_test_env();

    let students = table(&[
        &["Matrícula", "Nome", "Turma"],
        &["iq2900000001", "ANA DE souza", "1º A - MAC"],
        &["iq2900000002", "bruno lima", "1º A - MAC"],
    ]);
    let summary = manager.import_students(&students).unwrap();
    assert_eq!(summary.students, 2);
    assert_eq!(summary.groups, 1);

    let reservations = table(&[
        &["Prontuário", "Data", "Refeição", "Snacks"],
        &["IQ3000000001", "2025-05-10", "pão de queijo", "sim"],
    ]);
    let summary = manager.import_reservations(&reservations).unwrap();
    assert_eq!(summary.reservations, 1);

    manager
        .start_session(NewSession {
            meal: MealKind::Snack,
            date: "2025-05-10".into(),
            time: "09:30".into(),
            period: String::new(),
            groups: vec!["1º A - MAC".into()],
            snack_name: None,
        })
        .unwrap();

    let roster = manager.eligible().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Ana de Souza");
    assert_eq!(roster[0].dish.as_deref(), Some("Pão de Queijo"));
}

#[test]
fn export_rows_match_the_header_shape_and_order() {
    let mut manager = setup_test_env();
    let students = table(&[
        &["pront", "nome", "turma"],
        &["IQ3000000001", "Ana Souza", "1º A - MAC"],
        &["IQ3000000002", "Bruno Lima", "1º A - MAC"],
    ]);
    manager.import_students(&students).unwrap();
    manager.reserve_snacks_for_all("2025-05-10", "Suco");

    manager
        .start_session(NewSession {
            meal: MealKind::Snack,
            date: "2025-05-10".into(),
            time: "09:30".into(),
            period: String::new(),
            groups: vec!["1º A - MAC".into()],
            snack_name: None,
        })
        .unwrap();
    manager.mark_served("IQ3000000002").unwrap();
    manager.mark_served("IQ3000000001").unwrap();

    let rows = manager.served_table().unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.len(), EXPORT_HEADER.len());
        assert_eq!(row[4], "Suco");
    }
}

#[test]
fn bulk_snack_reservation_covers_every_student() {
    let mut manager = setup_test_env();
    let students = table(&[
        &["pront", "nome"],
        &["IQ3000000001", "Ana Souza"],
        &["IQ3000000002", "Bruno Lima"],
        &["IQ3000000003", "Carla Nunes"],
    ]);
    manager.import_students(&students).unwrap();

    assert_eq!(manager.reserve_snacks_for_all("2025-05-10", "Suco"), 3);
    // Re-running collapses onto the existing rows.
    assert_eq!(manager.reserve_snacks_for_all("2025-05-10", "Suco"), 0);
}

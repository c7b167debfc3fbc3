use std::fs;

use refectory_core::{
    domain::MealKind,
    registry::{ConsumptionDraft, Registry, ReservationDraft},
    storage::{JsonStorage, RegistryStore},
};
use tempfile::TempDir;

fn populated_registry() -> (Registry, u64) {
    let mut registry = Registry::new();
    let group = registry.add_group("1ºA").id();
    let ana = registry.add_student("IQ3000000001", "Ana Souza").id();
    registry.assign_group(ana, group);
    let reservation = registry
        .add_reservation(ReservationDraft {
            student_id: ana,
            dish: Some("Bolo".into()),
            date: "2025-05-10".into(),
            meal: MealKind::Snack,
            canceled: false,
        })
        .id();
    let session = registry
        .add_session(MealKind::Snack, "", "2025-05-10", "09:30", vec!["1ºA".into()])
        .expect("session");
    registry.add_consumption(
        session,
        ConsumptionDraft {
            student_id: ana,
            time: "09:31:00".into(),
            reservation_id: Some(reservation),
        },
    );
    (registry, session)
}

#[test]
fn snapshot_roundtrip_preserves_every_table() {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("storage");
    let (registry, session) = populated_registry();
    storage.save(&registry, "cafeteria").expect("save");

    let loaded = storage.load("cafeteria").expect("load");
    let ana = loaded.student_by_code("IQ3000000001").expect("student").id;
    assert_eq!(loaded.group_names_of(ana), vec!["1ºA".to_string()]);
    assert!(loaded
        .active_reservation_for(ana, "2025-05-10", MealKind::Snack)
        .is_some());
    assert!(loaded.consumption_for(ana, session).is_some());
    assert!(loaded.session(session).is_some());
}

#[test]
fn writes_leave_no_temporary_files_behind() {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("storage");
    let (registry, _) = populated_registry();
    storage.save(&registry, "cafeteria").expect("save");
    storage.save(&registry, "cafeteria").expect("overwrite");

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn ad_hoc_paths_work_outside_the_managed_directory() {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().join("managed"))).expect("storage");
    let path = temp.path().join("exports").join("snapshot.json");

    let (registry, _) = populated_registry();
    storage.save_to_path(&registry, &path).expect("save to path");
    let loaded = storage.load_from_path(&path).expect("load from path");
    assert!(loaded.student_by_code("IQ3000000001").is_some());
}

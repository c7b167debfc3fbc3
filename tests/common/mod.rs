use std::sync::Mutex;

use once_cell::sync::Lazy;
use refectory_core::{
    core::RegistryManager, state::SessionStateFile, storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated manager backed by a unique directory for each test.
pub fn setup_test_env() -> RegistryManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage =
        JsonStorage::new(Some(base.join("registries"))).expect("create json storage backend");
    let state = SessionStateFile::with_path(base.join("session.json"));
    RegistryManager::new(Box::new(storage), state)
}

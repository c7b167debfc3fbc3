use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".refectory_core";
const REGISTRY_DIR: &str = "registries";
const SESSION_STATE_FILE: &str = "session.json";

/// Returns the application data directory, defaulting to `~/.refectory_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("REFECTORY_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding managed registry snapshots.
pub fn registries_dir() -> PathBuf {
    app_data_dir().join(REGISTRY_DIR)
}

/// Path to the active-session state file.
pub fn session_state_file() -> PathBuf {
    app_data_dir().join(SESSION_STATE_FILE)
}

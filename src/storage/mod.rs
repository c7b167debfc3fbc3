pub mod json_backend;

use std::path::Path;

use crate::{errors::StorageError, registry::Registry};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstraction over persistence backends capable of storing registry
/// snapshots.
pub trait RegistryStore: Send + Sync {
    fn save(&self, registry: &Registry, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Registry>;

    /// Ad-hoc file operations; default implementations forward to the JSON
    /// helpers.
    fn save_to_path(&self, registry: &Registry, path: &Path) -> Result<()> {
        json_backend::save_registry_to_path(registry, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Registry> {
        json_backend::load_registry_from_path(path)
    }
}

pub use json_backend::JsonStorage;

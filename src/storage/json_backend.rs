use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::StorageError, registry::Registry, utils::paths};

use super::{RegistryStore, Result};

const TMP_SUFFIX: &str = "tmp";

/// Stores registry snapshots as pretty-printed JSON under a managed
/// directory, staging every write through a temporary file.
#[derive(Clone)]
pub struct JsonStorage {
    registries_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let registries_dir = root.unwrap_or_else(paths::registries_dir);
        fs::create_dir_all(&registries_dir)?;
        Ok(Self { registries_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn registry_path(&self, name: &str) -> PathBuf {
        self.registries_dir
            .join(format!("{}.json", canonical_name(name)))
    }
}

impl RegistryStore for JsonStorage {
    fn save(&self, registry: &Registry, name: &str) -> Result<()> {
        let path = self.registry_path(name);
        save_registry_to_path(registry, &path)
    }

    fn load(&self, name: &str) -> Result<Registry> {
        let path = self.registry_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(format!(
                "registry `{}` ({})",
                name,
                path.display()
            )));
        }
        load_registry_from_path(&path)
    }
}

/// Writes a registry snapshot atomically by staging to a temporary file.
pub fn save_registry_to_path(registry: &Registry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(registry)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_registry_from_path(path: &Path) -> Result<Registry> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "registry".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

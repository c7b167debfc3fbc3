use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

/// A student on the imported roster. Immutable after import except for group
/// membership, which lives in the registry's association set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: RecordId,
    /// Unique registration code (e.g. `IQ3000123456`).
    pub code: String,
    pub name: String,
}

/// A class. Created on first encounter during import, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: RecordId,
    pub name: String,
}

use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

/// Placeholder shown where a dish would be for students without a
/// reservation, and the pseudo-group filter that opts such students into the
/// eligibility roster.
pub const NO_RESERVATION: &str = "SEM RESERVA";

/// One row of the eligibility roster. Derived from queries, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EligibleStudent {
    pub student_id: RecordId,
    /// Registration code, the stable external key.
    pub code: String,
    pub name: String,
    /// Sorted, comma-joined union of the selected groups the student matched.
    pub groups: String,
    /// Dish from the backing reservation; `None` for walk-in eligibility.
    pub dish: Option<String>,
    pub reservation_id: Option<RecordId>,
    /// Obfuscated code for UI display only; recomputable, never a storage key.
    pub display_code: String,
}

impl EligibleStudent {
    /// Dish text or the no-reservation placeholder.
    pub fn dish_or_status(&self) -> &str {
        self.dish.as_deref().unwrap_or(NO_RESERVATION)
    }

    pub fn has_reservation(&self) -> bool {
        self.reservation_id.is_some()
    }
}

/// One row of the served-students table handed to the export collaborators:
/// (code, name, groups, time, dish-or-status).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServedRow {
    pub code: String,
    pub name: String,
    pub groups: String,
    pub time: String,
    pub status: String,
}

impl ServedRow {
    pub fn into_columns(self) -> [String; 5] {
        [self.code, self.name, self.groups, self.time, self.status]
    }
}

/// One entry of an externally authoritative served snapshot fed to
/// reconciliation. A snapshot time, when present, is preserved on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetServed {
    pub code: String,
    pub time: Option<String>,
}

impl TargetServed {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            time: None,
        }
    }

    pub fn at(code: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            time: Some(time.into()),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

/// Discriminates snack reservations/sessions from lunch ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Lunch,
    Snack,
}

impl MealKind {
    pub fn is_snack(self) -> bool {
        matches!(self, MealKind::Snack)
    }
}

impl fmt::Display for MealKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealKind::Lunch => write!(f, "lunch"),
            MealKind::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "lunch" | "almoço" | "almoco" => Ok(MealKind::Lunch),
            "snack" | "lanche" => Ok(MealKind::Snack),
            other => Err(format!("unknown meal kind `{other}`")),
        }
    }
}

/// A pre-order: student X intends to eat meal kind Y on date Z.
///
/// At most one active row exists per (student, date, meal); a conflicting
/// insert is collapsed onto the existing row rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub id: RecordId,
    pub student_id: RecordId,
    pub dish: Option<String>,
    /// Session date, `YYYY-MM-DD`.
    pub date: String,
    pub meal: MealKind,
    pub canceled: bool,
}

impl Reservation {
    /// True when the row counts toward eligibility for (date, meal).
    pub fn is_active_for(&self, date: &str, meal: MealKind) -> bool {
        !self.canceled && self.date == date && self.meal == meal
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::{MealKind, RecordId};

/// One concrete serving event. Unique on (meal, period, date, time);
/// duplicate creation is rejected. Sessions are never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: RecordId,
    pub meal: MealKind,
    /// Optional period label ("Integral", "Matutino", ...). Empty when unset.
    pub period: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Serving start time, `HH:MM`.
    pub time: String,
    /// Participating class names.
    pub groups: Vec<String>,
}

/// Input for session creation.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub meal: MealKind,
    pub date: String,
    pub time: String,
    pub period: String,
    pub groups: Vec<String>,
    /// Dish name used when snack reservations must be auto-created.
    pub snack_name: Option<String>,
}

/// Identity of the active session, passed explicitly into every core call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: RecordId,
    pub date: String,
    pub meal: MealKind,
    pub groups: Vec<String>,
}

impl SessionContext {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id,
            date: session.date.clone(),
            meal: session.meal,
            groups: session.groups.clone(),
        }
    }
}

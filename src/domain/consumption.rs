use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

/// Records that a student was actually served in a session.
///
/// At most one row exists per (student, session). Corrections delete and
/// recreate the row; it is never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Consumption {
    pub id: RecordId,
    pub student_id: RecordId,
    pub session_id: RecordId,
    /// Wall-clock serving time, `HH:MM:SS`.
    pub time: String,
    /// True exactly when no reservation backed this serving (walk-in).
    pub without_reservation: bool,
    pub reservation_id: Option<RecordId>,
}

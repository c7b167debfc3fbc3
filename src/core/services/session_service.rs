//! Active-session lifecycle: resume from the state file, create, retarget.

use chrono::{NaiveDate, NaiveTime};

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{MealKind, NewSession, RecordId, SessionContext};
use crate::registry::{Registry, ReservationDraft};
use crate::state::SessionStateFile;

/// Group-name suffixes of the full-time integrated programs. Students in
/// these classes get an implied snack reservation when a snack session opens
/// on a date with none.
pub const INTEGRATED_PROGRAM_SUFFIXES: &[&str] = &["- MAC", "- MEC"];

const DEFAULT_SNACK_NAME: &str = "Lanche Padrão";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub struct SessionService;

impl SessionService {
    /// Resumes the session recorded in the state file. Absent file, sentinel
    /// value, or an id with no matching session row all report
    /// `NoActiveSession`, and the file is reset so the stale id is not
    /// retried on the next start.
    pub fn load(
        registry: &Registry,
        state: &SessionStateFile,
    ) -> ServiceResult<SessionContext> {
        let Some(id) = state.load()? else {
            return Err(ServiceError::NoActiveSession);
        };
        match registry.session(id) {
            Some(session) => {
                tracing::info!(session = id, date = %session.date, "resumed active session");
                Ok(SessionContext::from_session(session))
            }
            None => {
                tracing::warn!(session = id, "state file points at a missing session, clearing");
                state.clear()?;
                Err(ServiceError::NoActiveSession)
            }
        }
    }

    /// Creates a session, persists its id to the state file, and returns the
    /// context for it.
    ///
    /// A lunch session needs at least one active lunch reservation on its
    /// date. A snack session on a date with no snack reservations implies
    /// them for the integrated-program classes first, so those students show
    /// up as reserved rather than walk-ins.
    pub fn create(
        registry: &mut Registry,
        state: &SessionStateFile,
        input: NewSession,
    ) -> ServiceResult<SessionContext> {
        if NaiveDate::parse_from_str(&input.date, DATE_FORMAT).is_err() {
            return Err(ServiceError::Rejected(format!(
                "invalid session date '{}'",
                input.date
            )));
        }
        if NaiveTime::parse_from_str(&input.time, TIME_FORMAT).is_err() {
            return Err(ServiceError::Rejected(format!(
                "invalid session time '{}'",
                input.time
            )));
        }

        match input.meal {
            MealKind::Lunch => {
                if !registry.has_active_reservations(&input.date, MealKind::Lunch) {
                    return Err(ServiceError::Rejected(format!(
                        "no lunch reservations for {}",
                        input.date
                    )));
                }
            }
            MealKind::Snack => {
                if !registry.has_active_reservations(&input.date, MealKind::Snack) {
                    let dish = input
                        .snack_name
                        .clone()
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_SNACK_NAME.to_string());
                    let created =
                        Self::reserve_snacks_for_integrated(registry, &input.date, &dish);
                    tracing::info!(
                        date = %input.date,
                        dish = %dish,
                        created,
                        "implied snack reservations for integrated classes"
                    );
                }
            }
        }

        let id = registry
            .add_session(
                input.meal,
                &input.period,
                &input.date,
                &input.time,
                input.groups.clone(),
            )
            .ok_or_else(|| {
                ServiceError::Rejected(format!(
                    "session already exists for {} {} {} {}",
                    input.meal, input.period, input.date, input.time
                ))
            })?;
        state.save(Some(id))?;
        tracing::info!(session = id, meal = %input.meal, date = %input.date, "session created");

        // The row was just inserted; the lookup cannot miss.
        let session = registry
            .session(id)
            .ok_or(ServiceError::SessionNotFound(id))?;
        Ok(SessionContext::from_session(session))
    }

    /// Replaces the participating group list of an existing session.
    pub fn set_groups(
        registry: &mut Registry,
        session_id: RecordId,
        groups: Vec<String>,
    ) -> ServiceResult<Vec<String>> {
        registry
            .set_session_groups(session_id, groups)
            .ok_or(ServiceError::SessionNotFound(session_id))
    }

    fn reserve_snacks_for_integrated(registry: &mut Registry, date: &str, dish: &str) -> usize {
        let student_ids: Vec<RecordId> = registry
            .students()
            .iter()
            .filter(|student| {
                registry.group_names_of(student.id).iter().any(|name| {
                    INTEGRATED_PROGRAM_SUFFIXES
                        .iter()
                        .any(|suffix| name.ends_with(suffix))
                })
            })
            .map(|student| student.id)
            .collect();
        let drafts = student_ids
            .into_iter()
            .map(|student_id| ReservationDraft {
                student_id,
                dish: Some(dish.to_string()),
                date: date.to_string(),
                meal: MealKind::Snack,
                canceled: false,
            })
            .collect();
        registry.bulk_add_reservations(drafts)
    }
}

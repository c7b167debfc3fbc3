//! The consumption ledger: one student's served mark per session.

use std::collections::BTreeSet;

use chrono::Local;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{RecordId, ServedRow, SessionContext, NO_RESERVATION};
use crate::registry::{ConsumptionDraft, Registry};

pub struct ConsumptionService;

impl ConsumptionService {
    /// Marks a student as served at the current wall-clock time.
    pub fn mark_served(
        registry: &mut Registry,
        ctx: &SessionContext,
        code: &str,
    ) -> ServiceResult<RecordId> {
        let time = Local::now().format("%H:%M:%S").to_string();
        Self::mark_served_at(registry, ctx, code, &time)
    }

    /// Marks a student as served with an explicit time string.
    ///
    /// Marking an already-served student is an expected failure and leaves
    /// the ledger untouched. The consumption is linked to the student's
    /// active reservation for the session's date and meal when one exists;
    /// otherwise the walk-in flag is set.
    pub fn mark_served_at(
        registry: &mut Registry,
        ctx: &SessionContext,
        code: &str,
        time: &str,
    ) -> ServiceResult<RecordId> {
        let student_id = registry
            .student_by_code(code)
            .ok_or_else(|| ServiceError::StudentNotFound(code.to_string()))?
            .id;
        if registry.consumption_for(student_id, ctx.session_id).is_some() {
            tracing::warn!(code, session = ctx.session_id, "already served, mark skipped");
            return Err(ServiceError::AlreadyServed(code.to_string()));
        }
        let reservation_id = registry
            .active_reservation_for(student_id, &ctx.date, ctx.meal)
            .map(|r| r.id);
        let id = registry
            .add_consumption(
                ctx.session_id,
                ConsumptionDraft {
                    student_id,
                    time: time.to_string(),
                    reservation_id,
                },
            )
            .ok_or_else(|| ServiceError::AlreadyServed(code.to_string()))?;
        tracing::info!(code, session = ctx.session_id, "consumption recorded");
        Ok(id)
    }

    /// Deletes a student's served mark. Unmarking a student who is not in
    /// the served set is an expected failure.
    pub fn unmark_served(
        registry: &mut Registry,
        ctx: &SessionContext,
        code: &str,
    ) -> ServiceResult<()> {
        let student_id = registry
            .student_by_code(code)
            .ok_or_else(|| ServiceError::StudentNotFound(code.to_string()))?
            .id;
        if !registry.remove_consumption(student_id, ctx.session_id) {
            tracing::warn!(code, session = ctx.session_id, "not served, unmark skipped");
            return Err(ServiceError::NotServed(code.to_string()));
        }
        tracing::info!(code, session = ctx.session_id, "consumption deleted");
        Ok(())
    }

    /// Registration codes of the students served in the session, re-derived
    /// from the ledger on every call.
    pub fn served_set(registry: &Registry, session_id: RecordId) -> BTreeSet<String> {
        registry
            .consumptions_for_session(session_id)
            .into_iter()
            .filter_map(|c| registry.student(c.student_id))
            .map(|s| s.code.clone())
            .collect()
    }

    /// Served rows in export order: most recent serving first, name as the
    /// tiebreaker. The group column joins all of the student's groups.
    pub fn served_details(registry: &Registry, session_id: RecordId) -> Vec<ServedRow> {
        let mut rows: Vec<ServedRow> = registry
            .consumptions_for_session(session_id)
            .into_iter()
            .filter_map(|consumption| {
                let student = registry.student(consumption.student_id)?;
                let status = consumption
                    .reservation_id
                    .and_then(|id| registry.reservation(id))
                    .and_then(|r| r.dish.clone())
                    .unwrap_or_else(|| NO_RESERVATION.to_string());
                Some(ServedRow {
                    code: student.code.clone(),
                    name: student.name.clone(),
                    groups: registry.group_names_of(student.id).join(","),
                    time: consumption.time.clone(),
                    status,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MealKind;
    use crate::registry::ReservationDraft;

    fn setup() -> (Registry, SessionContext) {
        let mut registry = Registry::new();
        let student = registry.add_student("IQ3000000001", "Ana Souza").id();
        let group = registry.add_group("1ºA").id();
        registry.assign_group(student, group);
        registry.add_reservation(ReservationDraft {
            student_id: student,
            dish: Some("Pão de Queijo".into()),
            date: "2025-05-10".into(),
            meal: MealKind::Snack,
            canceled: false,
        });
        let session_id = registry
            .add_session(MealKind::Snack, "", "2025-05-10", "09:30", vec!["1ºA".into()])
            .unwrap();
        let ctx = SessionContext {
            session_id,
            date: "2025-05-10".into(),
            meal: MealKind::Snack,
            groups: vec!["1ºA".into()],
        };
        (registry, ctx)
    }

    #[test]
    fn second_mark_is_a_no_op_failure() {
        let (mut registry, ctx) = setup();
        let first = ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000001", "09:31:00");
        assert!(first.is_ok());
        let second =
            ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000001", "09:32:00");
        assert!(matches!(second, Err(ServiceError::AlreadyServed(_))));
        assert_eq!(ConsumptionService::served_set(&registry, ctx.session_id).len(), 1);
    }

    #[test]
    fn mark_links_reservation_and_clears_walk_in_flag() {
        let (mut registry, ctx) = setup();
        ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000001", "09:31:00")
            .unwrap();
        let student_id = registry.student_by_code("IQ3000000001").unwrap().id;
        let row = registry.consumption_for(student_id, ctx.session_id).unwrap();
        assert!(row.reservation_id.is_some());
        assert!(!row.without_reservation);
    }

    #[test]
    fn walk_in_mark_sets_flag() {
        let (mut registry, ctx) = setup();
        let walk_in = registry.add_student("IQ3000000002", "Bruno Lima").id();
        ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000002", "09:33:00")
            .unwrap();
        let row = registry.consumption_for(walk_in, ctx.session_id).unwrap();
        assert!(row.without_reservation);
        assert!(row.reservation_id.is_none());
    }

    #[test]
    fn unmark_restores_prior_state() {
        let (mut registry, ctx) = setup();
        let before = ConsumptionService::served_set(&registry, ctx.session_id);
        ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000001", "09:31:00")
            .unwrap();
        ConsumptionService::unmark_served(&mut registry, &ctx, "IQ3000000001").unwrap();
        assert_eq!(ConsumptionService::served_set(&registry, ctx.session_id), before);
    }

    #[test]
    fn unmark_without_mark_is_a_no_op_failure() {
        let (mut registry, ctx) = setup();
        let result = ConsumptionService::unmark_served(&mut registry, &ctx, "IQ3000000001");
        assert!(matches!(result, Err(ServiceError::NotServed(_))));
    }

    #[test]
    fn unknown_code_is_reported() {
        let (mut registry, ctx) = setup();
        let result =
            ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000999999", "09:31:00");
        assert!(matches!(result, Err(ServiceError::StudentNotFound(_))));
    }

    #[test]
    fn served_details_order_is_time_desc_then_name() {
        let (mut registry, ctx) = setup();
        let bruno = registry.add_student("IQ3000000002", "Bruno Lima").id();
        let group = registry.add_group("1ºB").id();
        registry.assign_group(bruno, group);
        ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000001", "09:31:00")
            .unwrap();
        ConsumptionService::mark_served_at(&mut registry, &ctx, "IQ3000000002", "09:40:00")
            .unwrap();

        let rows = ConsumptionService::served_details(&registry, ctx.session_id);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Bruno Lima");
        assert_eq!(rows[0].status, NO_RESERVATION);
        assert_eq!(rows[1].name, "Ana Souza");
        assert_eq!(rows[1].status, "Pão de Queijo");
    }
}

//! Resolves which students may be served in the active session.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::services::{ConsumptionService, ServiceError, ServiceResult};
use crate::domain::{EligibleStudent, SessionContext, NO_RESERVATION};
use crate::registry::Registry;
use crate::utils::text;

pub struct EligibilityService;

impl EligibilityService {
    /// Computes the eligibility roster for the session context.
    ///
    /// The `SEM RESERVA` pseudo-group is not a real class: its presence in
    /// the filter opts in students of the other selected groups who hold no
    /// reservation row for the session's date and meal. A context with no
    /// date or no groups is an expected failure, distinct from an empty
    /// roster.
    pub fn resolve(
        registry: &Registry,
        ctx: &SessionContext,
    ) -> ServiceResult<Vec<EligibleStudent>> {
        if ctx.date.trim().is_empty() || ctx.groups.is_empty() {
            tracing::warn!("cannot resolve eligibility: incomplete session context");
            return Err(ServiceError::SessionNotReady);
        }

        let mut selected: BTreeSet<String> = ctx
            .groups
            .iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if selected.is_empty() {
            return Err(ServiceError::SessionNotReady);
        }
        let include_unreserved = selected.remove(NO_RESERVATION);
        if selected.is_empty() {
            // Sentinel-only filter: no real group to query against.
            return Ok(Vec::new());
        }

        let mut roster: BTreeMap<String, EligibleStudent> = BTreeMap::new();

        // Reserved pass: students of a selected group holding an active
        // reservation for (date, meal).
        for reservation in registry.active_reservations_on(&ctx.date, ctx.meal) {
            let Some(student) = registry.student(reservation.student_id) else {
                tracing::warn!(
                    reservation = reservation.id,
                    "reservation references unknown student"
                );
                continue;
            };
            let matched = registry.matched_groups_of(student.id, &selected);
            if matched.is_empty() {
                continue;
            }
            match roster.get_mut(&student.code) {
                Some(entry) => {
                    // Same student matched through another row: keep the
                    // first real dish over the placeholder.
                    if is_placeholder(entry.dish.as_deref())
                        && !is_placeholder(reservation.dish.as_deref())
                    {
                        entry.dish = reservation.dish.clone();
                        entry.reservation_id = Some(reservation.id);
                    }
                }
                None => {
                    roster.insert(
                        student.code.clone(),
                        EligibleStudent {
                            student_id: student.id,
                            code: student.code.clone(),
                            name: student.name.clone(),
                            groups: matched.join(","),
                            dish: reservation.dish.clone(),
                            reservation_id: Some(reservation.id),
                            display_code: text::display_code(&student.code),
                        },
                    );
                }
            }
        }

        // Walk-in pass: students of a selected group with no reservation row
        // at all for (date, meal). Reservation presence wins over arrival
        // order, so existing roster entries are never replaced.
        if include_unreserved {
            for student in registry.students() {
                if roster.contains_key(&student.code) {
                    continue;
                }
                let matched = registry.matched_groups_of(student.id, &selected);
                if matched.is_empty() {
                    continue;
                }
                if registry.has_reservation_row(student.id, &ctx.date, ctx.meal) {
                    continue;
                }
                roster.insert(
                    student.code.clone(),
                    EligibleStudent {
                        student_id: student.id,
                        code: student.code.clone(),
                        name: student.name.clone(),
                        groups: matched.join(","),
                        dish: None,
                        reservation_id: None,
                        display_code: text::display_code(&student.code),
                    },
                );
            }
        }

        let mut students: Vec<EligibleStudent> = roster.into_values().collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        tracing::debug!(
            session = ctx.session_id,
            count = students.len(),
            "eligibility roster resolved"
        );
        Ok(students)
    }

    /// The roster minus students already served in the session.
    pub fn remaining(
        registry: &Registry,
        ctx: &SessionContext,
    ) -> ServiceResult<Vec<EligibleStudent>> {
        let served = ConsumptionService::served_set(registry, ctx.session_id);
        let mut roster = Self::resolve(registry, ctx)?;
        roster.retain(|student| !served.contains(&student.code));
        Ok(roster)
    }
}

fn is_placeholder(dish: Option<&str>) -> bool {
    dish.map_or(true, |d| d == NO_RESERVATION)
}

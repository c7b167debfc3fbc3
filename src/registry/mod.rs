//! The in-memory relational document backing the core services.
//!
//! The registry owns the five record tables, allocates row ids, and enforces
//! the schema's uniqueness constraints: reservations collapse conflicting
//! inserts onto the existing row, sessions and consumptions reject them.
//! Services hold no write-authoritative state of their own; everything is
//! re-derivable from here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Consumption, Group, MealKind, RecordId, Reservation, Session, Student,
};

/// Result of an insert against a uniqueness constraint that ignores
/// conflicts: either a fresh row or the row the insert collapsed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(RecordId),
    Existing(RecordId),
}

impl InsertOutcome {
    pub fn id(self) -> RecordId {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::Existing(id) => id,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Draft rows for the conflict-ignoring bulk inserts.
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub student_id: RecordId,
    pub dish: Option<String>,
    pub date: String,
    pub meal: MealKind,
    pub canceled: bool,
}

#[derive(Debug, Clone)]
pub struct ConsumptionDraft {
    pub student_id: RecordId,
    pub time: String,
    pub reservation_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    next_id: RecordId,
    students: Vec<Student>,
    groups: Vec<Group>,
    reservations: Vec<Reservation>,
    sessions: Vec<Session>,
    consumptions: Vec<Consumption>,
    /// (student_id, group_id) membership pairs.
    memberships: BTreeSet<(RecordId, RecordId)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    // --- students and groups ---

    /// Inserts a student unless the registration code is already present.
    pub fn add_student(&mut self, code: &str, name: &str) -> InsertOutcome {
        if let Some(existing) = self.student_by_code(code) {
            return InsertOutcome::Existing(existing.id);
        }
        let id = self.alloc();
        self.students.push(Student {
            id,
            code: code.to_string(),
            name: name.to_string(),
        });
        InsertOutcome::Inserted(id)
    }

    pub fn student(&self, id: RecordId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_by_code(&self, code: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.code == code)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Inserts a group unless the name is already present.
    pub fn add_group(&mut self, name: &str) -> InsertOutcome {
        if let Some(existing) = self.group_by_name(name) {
            return InsertOutcome::Existing(existing.id);
        }
        let id = self.alloc();
        self.groups.push(Group {
            id,
            name: name.to_string(),
        });
        InsertOutcome::Inserted(id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Adds a membership pair; returns false when it already existed.
    pub fn assign_group(&mut self, student_id: RecordId, group_id: RecordId) -> bool {
        self.memberships.insert((student_id, group_id))
    }

    /// All group names the student belongs to, sorted.
    pub fn group_names_of(&self, student_id: RecordId) -> Vec<String> {
        let mut names: Vec<String> = self
            .memberships
            .iter()
            .filter(|(sid, _)| *sid == student_id)
            .filter_map(|(_, gid)| self.groups.iter().find(|g| g.id == *gid))
            .map(|g| g.name.clone())
            .collect();
        names.sort();
        names
    }

    /// The subset of `selected` group names the student belongs to, sorted.
    pub fn matched_groups_of(
        &self,
        student_id: RecordId,
        selected: &BTreeSet<String>,
    ) -> Vec<String> {
        self.group_names_of(student_id)
            .into_iter()
            .filter(|name| selected.contains(name))
            .collect()
    }

    // --- reservations ---

    /// Inserts a reservation, collapsing onto the existing row when the
    /// (student, date, meal) constraint already holds one.
    pub fn add_reservation(&mut self, draft: ReservationDraft) -> InsertOutcome {
        if let Some(existing) = self.reservations.iter().find(|r| {
            r.student_id == draft.student_id && r.date == draft.date && r.meal == draft.meal
        }) {
            return InsertOutcome::Existing(existing.id);
        }
        let id = self.alloc();
        self.reservations.push(Reservation {
            id,
            student_id: draft.student_id,
            dish: draft.dish,
            date: draft.date,
            meal: draft.meal,
            canceled: draft.canceled,
        });
        InsertOutcome::Inserted(id)
    }

    /// Conflict-ignoring batch insert; returns how many rows were new.
    pub fn bulk_add_reservations(&mut self, drafts: Vec<ReservationDraft>) -> usize {
        drafts
            .into_iter()
            .filter(|draft| self.add_reservation(draft.clone()).is_inserted())
            .count()
    }

    pub fn reservation(&self, id: RecordId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    pub fn cancel_reservation(&mut self, id: RecordId) -> bool {
        match self.reservations.iter_mut().find(|r| r.id == id) {
            Some(reservation) => {
                reservation.canceled = true;
                true
            }
            None => false,
        }
    }

    /// The active (non-canceled) reservation for (student, date, meal).
    pub fn active_reservation_for(
        &self,
        student_id: RecordId,
        date: &str,
        meal: MealKind,
    ) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|r| r.student_id == student_id && r.is_active_for(date, meal))
    }

    /// Whether any reservation row, canceled or not, matches (student, date,
    /// meal). The walk-in pass checks this rather than activity: a canceled
    /// reservation still marks the student as having ordered.
    pub fn has_reservation_row(
        &self,
        student_id: RecordId,
        date: &str,
        meal: MealKind,
    ) -> bool {
        self.reservations
            .iter()
            .any(|r| r.student_id == student_id && r.date == date && r.meal == meal)
    }

    pub fn has_active_reservations(&self, date: &str, meal: MealKind) -> bool {
        self.reservations.iter().any(|r| r.is_active_for(date, meal))
    }

    pub fn active_reservations_on(&self, date: &str, meal: MealKind) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.is_active_for(date, meal))
            .collect()
    }

    // --- sessions ---

    /// Inserts a session; `None` when (meal, period, date, time) is taken.
    pub fn add_session(
        &mut self,
        meal: MealKind,
        period: &str,
        date: &str,
        time: &str,
        groups: Vec<String>,
    ) -> Option<RecordId> {
        let duplicate = self.sessions.iter().any(|s| {
            s.meal == meal && s.period == period && s.date == date && s.time == time
        });
        if duplicate {
            return None;
        }
        let id = self.alloc();
        self.sessions.push(Session {
            id,
            meal,
            period: period.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            groups,
        });
        Some(id)
    }

    pub fn session(&self, id: RecordId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Replaces a session's participating groups; `None` for an unknown id.
    pub fn set_session_groups(
        &mut self,
        id: RecordId,
        groups: Vec<String>,
    ) -> Option<Vec<String>> {
        let session = self.sessions.iter_mut().find(|s| s.id == id)?;
        session.groups = groups;
        Some(session.groups.clone())
    }

    // --- consumptions ---

    /// Inserts a consumption; `None` when (student, session) already holds
    /// one. The walk-in flag is derived from the reservation linkage.
    pub fn add_consumption(
        &mut self,
        session_id: RecordId,
        draft: ConsumptionDraft,
    ) -> Option<RecordId> {
        if self.consumption_for(draft.student_id, session_id).is_some() {
            return None;
        }
        let id = self.alloc();
        self.consumptions.push(Consumption {
            id,
            student_id: draft.student_id,
            session_id,
            time: draft.time,
            without_reservation: draft.reservation_id.is_none(),
            reservation_id: draft.reservation_id,
        });
        Some(id)
    }

    /// Conflict-ignoring batch insert; returns how many rows were new.
    pub fn bulk_add_consumptions(
        &mut self,
        session_id: RecordId,
        drafts: Vec<ConsumptionDraft>,
    ) -> usize {
        drafts
            .into_iter()
            .filter(|draft| self.add_consumption(session_id, draft.clone()).is_some())
            .count()
    }

    pub fn consumption_for(
        &self,
        student_id: RecordId,
        session_id: RecordId,
    ) -> Option<&Consumption> {
        self.consumptions
            .iter()
            .find(|c| c.student_id == student_id && c.session_id == session_id)
    }

    pub fn remove_consumption(&mut self, student_id: RecordId, session_id: RecordId) -> bool {
        let before = self.consumptions.len();
        self.consumptions
            .retain(|c| !(c.student_id == student_id && c.session_id == session_id));
        self.consumptions.len() != before
    }

    /// Batch delete filtered by session and student-id set; returns the
    /// number of removed rows.
    pub fn delete_consumptions(
        &mut self,
        session_id: RecordId,
        student_ids: &BTreeSet<RecordId>,
    ) -> usize {
        let before = self.consumptions.len();
        self.consumptions
            .retain(|c| !(c.session_id == session_id && student_ids.contains(&c.student_id)));
        before - self.consumptions.len()
    }

    pub fn consumptions_for_session(&self, session_id: RecordId) -> Vec<&Consumption> {
        self.consumptions
            .iter()
            .filter(|c| c.session_id == session_id)
            .collect()
    }
}

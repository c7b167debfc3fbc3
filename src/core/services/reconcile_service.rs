//! Converges the stored served-set to an externally authoritative snapshot.

use std::collections::BTreeSet;

use chrono::Local;

use crate::core::services::{ConsumptionService, ServiceResult};
use crate::domain::{RecordId, SessionContext, TargetServed};
use crate::registry::{ConsumptionDraft, Registry};

/// Counts reported back to the caller after a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub removed: usize,
    pub inserted: usize,
    /// Snapshot entries whose code matched no student on the roster.
    pub skipped: usize,
}

pub struct ReconcileService;

impl ReconcileService {
    /// Applies the minimal set of deletions and insertions so the ledger
    /// matches `target` exactly, no matter how many UI-only toggles happened
    /// in between.
    ///
    /// Deletes run before inserts, the delete is one batch filtered by
    /// session and student set, and the insert is one conflict-ignoring
    /// batch. Re-running with the same target converges to the same state,
    /// so a failed half is always recoverable by calling again. Eligibility
    /// views must be recomputed afterwards; they are derived from the same
    /// reservation set this call mutates against.
    pub fn reconcile(
        registry: &mut Registry,
        ctx: &SessionContext,
        target: &[TargetServed],
    ) -> ServiceResult<ReconcileOutcome> {
        let current = ConsumptionService::served_set(registry, ctx.session_id);
        let target_codes: BTreeSet<&str> =
            target.iter().map(|entry| entry.code.as_str()).collect();

        let to_unmark: BTreeSet<RecordId> = current
            .iter()
            .filter(|code| !target_codes.contains(code.as_str()))
            .filter_map(|code| registry.student_by_code(code))
            .map(|student| student.id)
            .collect();
        let removed = registry.delete_consumptions(ctx.session_id, &to_unmark);

        let fallback_time = Local::now().format("%H:%M:%S").to_string();
        let mut drafts = Vec::new();
        let mut skipped = 0usize;
        for entry in target {
            if current.contains(&entry.code) {
                continue;
            }
            match registry.student_by_code(&entry.code) {
                Some(student) => {
                    let reservation_id = registry
                        .active_reservation_for(student.id, &ctx.date, ctx.meal)
                        .map(|r| r.id);
                    drafts.push(ConsumptionDraft {
                        student_id: student.id,
                        time: entry.time.clone().unwrap_or_else(|| fallback_time.clone()),
                        reservation_id,
                    });
                }
                None => {
                    tracing::warn!(code = %entry.code, "snapshot entry matches no student, skipping");
                    skipped += 1;
                }
            }
        }
        let inserted = registry.bulk_add_consumptions(ctx.session_id, drafts);

        tracing::info!(
            session = ctx.session_id,
            removed,
            inserted,
            skipped,
            "served-set reconciled"
        );
        Ok(ReconcileOutcome {
            removed,
            inserted,
            skipped,
        })
    }
}

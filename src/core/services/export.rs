//! Served-rows tabular boundary.
//!
//! The core hands frontends a plain table; writing spreadsheet or text files
//! is their job, never this crate's.

use crate::core::services::ConsumptionService;
use crate::domain::RecordId;
use crate::registry::Registry;

/// Column titles matching the order of [`served_table`] rows.
pub const EXPORT_HEADER: [&str; 5] = ["Matrícula", "Nome", "Turma", "Hora", "Refeição"];

/// The served students of a session as (code, name, groups, time,
/// dish-or-status) rows, most recent first.
pub fn served_table(registry: &Registry, session_id: RecordId) -> Vec<[String; 5]> {
    ConsumptionService::served_details(registry, session_id)
        .into_iter()
        .map(|row| row.into_columns())
        .collect()
}

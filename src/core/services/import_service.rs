//! Tabular import boundary.
//!
//! Callers hand over raw two-dimensional string tables (first row is the
//! header) parsed out of whatever file format the frontend reads. Header
//! aliases, code canonicalization, and name casing are normalized here so
//! the registry only ever sees clean values.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::MealKind;
use crate::registry::{Registry, ReservationDraft};
use crate::utils::text;

/// Raw imported rows; `table[0]` is the header.
pub type Table = Vec<Vec<String>>;

/// Dish recorded when a reservation row carries none.
const UNSPECIFIED_DISH: &str = "Não Especificado";

const TRUTHY: &[&str] = &["true", "1", "sim", "yes"];

/// Counts reported after an import pass. Only the fields relevant to the
/// operation are populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub students: usize,
    pub groups: usize,
    pub associations: usize,
    pub reservations: usize,
    /// Rows dropped for missing required values or unknown codes.
    pub skipped: usize,
}

pub struct ImportService;

impl ImportService {
    /// Imports students and their class memberships. Missing groups are
    /// created on first encounter; existing students and memberships
    /// collapse silently.
    pub fn import_students(
        registry: &mut Registry,
        table: &[Vec<String>],
    ) -> ServiceResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        let Some((header, rows)) = split_header(table) else {
            return Ok(summary);
        };
        let code_col = require_column(&header, "pront")?;
        let name_col = require_column(&header, "nome")?;
        let group_col = find_column(&header, "turma");

        for (i, row) in rows.iter().enumerate() {
            let code = text::canonical_code(cell(row, code_col));
            let name = text::title_case(cell(row, name_col));
            if code.is_empty() || name.is_empty() {
                tracing::warn!(row = i + 2, "student row missing code or name, skipping");
                summary.skipped += 1;
                continue;
            }
            let student = registry.add_student(&code, &name);
            if student.is_inserted() {
                summary.students += 1;
            }
            if let Some(col) = group_col {
                let group_name = cell(row, col).trim();
                if !group_name.is_empty() {
                    let group = registry.add_group(group_name);
                    if group.is_inserted() {
                        summary.groups += 1;
                    }
                    if registry.assign_group(student.id(), group.id()) {
                        summary.associations += 1;
                    }
                }
            }
        }
        tracing::info!(
            students = summary.students,
            groups = summary.groups,
            associations = summary.associations,
            skipped = summary.skipped,
            "student import finished"
        );
        Ok(summary)
    }

    /// Imports reservation rows. Students must already exist; rows naming an
    /// unknown code are skipped and counted. The insert batch ignores
    /// (student, date, meal) conflicts.
    pub fn import_reservations(
        registry: &mut Registry,
        table: &[Vec<String>],
    ) -> ServiceResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        let Some((header, rows)) = split_header(table) else {
            return Ok(summary);
        };
        let code_col = require_column(&header, "pront")?;
        let date_col = require_column(&header, "data")?;
        let dish_col = find_column(&header, "dish");
        let snacks_col = find_column(&header, "snacks");
        let canceled_col = find_column(&header, "canceled");

        let mut drafts = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let code = text::canonical_code(cell(row, code_col));
            let date = cell(row, date_col).trim().to_string();
            if code.is_empty() || date.is_empty() {
                tracing::warn!(row = i + 2, "reservation row missing code or date, skipping");
                summary.skipped += 1;
                continue;
            }
            let Some(student) = registry.student_by_code(&code) else {
                tracing::warn!(row = i + 2, code = %code, "reservation for unknown student, skipping");
                summary.skipped += 1;
                continue;
            };
            let meal = if truthy(flag_cell(row, snacks_col)) {
                MealKind::Snack
            } else {
                MealKind::Lunch
            };
            let dish = dish_col
                .map(|col| text::title_case(cell(row, col)))
                .filter(|dish| !dish.is_empty())
                .unwrap_or_else(|| UNSPECIFIED_DISH.to_string());
            drafts.push(ReservationDraft {
                student_id: student.id,
                dish: Some(dish),
                date,
                meal,
                canceled: truthy(flag_cell(row, canceled_col)),
            });
        }
        summary.reservations = registry.bulk_add_reservations(drafts);
        tracing::info!(
            reservations = summary.reservations,
            skipped = summary.skipped,
            "reservation import finished"
        );
        Ok(summary)
    }

    /// Creates one snack reservation per enrolled student for the given
    /// date, ignoring students that already hold one. Returns the number of
    /// new rows.
    pub fn reserve_snacks_for_all(registry: &mut Registry, date: &str, dish: &str) -> usize {
        let drafts: Vec<ReservationDraft> = registry
            .students()
            .iter()
            .map(|student| ReservationDraft {
                student_id: student.id,
                dish: Some(dish.to_string()),
                date: date.to_string(),
                meal: MealKind::Snack,
                canceled: false,
            })
            .collect();
        let created = registry.bulk_add_reservations(drafts);
        tracing::info!(date = %date, dish = %dish, created, "bulk snack reservation finished");
        created
    }
}

fn split_header(table: &[Vec<String>]) -> Option<(Vec<String>, &[Vec<String>])> {
    let (first, rest) = table.split_first()?;
    let header = first.iter().map(|h| text::normalize_key(h)).collect();
    Some((header, rest))
}

fn find_column(header: &[String], key: &str) -> Option<usize> {
    header.iter().position(|h| h == key)
}

fn require_column(header: &[String], key: &str) -> ServiceResult<usize> {
    find_column(header, key)
        .ok_or_else(|| ServiceError::Rejected(format!("import table is missing column '{key}'")))
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map_or("", String::as_str)
}

fn flag_cell(row: &[String], col: Option<usize>) -> &str {
    col.map_or("", |col| cell(row, col))
}

fn truthy(value: &str) -> bool {
    TRUTHY.contains(&value.trim().to_lowercase().as_str())
}

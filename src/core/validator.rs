use crate::config::ColumnConfig;
use crate::core::timestamp::parse_timestamp;
use crate::domain::model::{RejectReason, Row, Table, Value, ValidationSummary};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Trims `s` and parses it as a base-10 integer, keeping it only when strictly positive.
pub fn parse_positive_integer(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

pub fn is_positive_integer(s: &str) -> bool {
    parse_positive_integer(s).is_some()
}

fn value_is_timestamp(value: &Value) -> bool {
    match value {
        Value::Timestamp(_) => true,
        Value::Text(text) => parse_timestamp(text).is_some(),
        Value::Empty => false,
    }
}

struct ColumnIndexes {
    segment: usize,
    time: usize,
    target: usize,
    id: usize,
}

/// Keeps rows with a valid timestamp, positive-integer segment and target,
/// and a positive-integer id not seen earlier in the table.
#[derive(Debug, Clone, Default)]
pub struct RowValidator {
    columns: ColumnConfig,
}

impl RowValidator {
    pub fn new(columns: ColumnConfig) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn validate(&self, table: Table) -> Result<Table> {
        self.validate_with_report(table).map(|(table, _)| table)
    }

    pub fn validate_with_report(&self, table: Table) -> Result<(Table, ValidationSummary)> {
        let indexes = ColumnIndexes {
            segment: table.column_index(&self.columns.segment)?,
            time: table.column_index(&self.columns.time)?,
            target: table.column_index(&self.columns.target)?,
            id: table.column_index(&self.columns.id)?,
        };

        let Table { columns, rows } = table;
        let mut seen_ids: HashSet<i64> = HashSet::new();
        let mut summary = ValidationSummary::default();

        let rows: Vec<Row> = rows
            .into_iter()
            .filter(|row| match check_row(row, &indexes, &mut seen_ids) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::debug!("Dropping row at line {}: {}", row.line, reason);
                    summary.record(reason);
                    false
                }
            })
            .collect();

        if summary.total() > 0 {
            tracing::info!(
                "Validation dropped {} rows ({} kept)",
                summary.total(),
                rows.len()
            );
        }

        Ok((Table { columns, rows }, summary))
    }
}

fn check_row(
    row: &Row,
    indexes: &ColumnIndexes,
    seen_ids: &mut HashSet<i64>,
) -> std::result::Result<(), RejectReason> {
    if !value_is_timestamp(row.get(indexes.time)) {
        return Err(RejectReason::InvalidTimestamp);
    }
    if !is_positive_integer(&row.get(indexes.segment).as_raw()) {
        return Err(RejectReason::InvalidSegment);
    }
    if !is_positive_integer(&row.get(indexes.target).as_raw()) {
        return Err(RejectReason::InvalidTarget);
    }
    let id = parse_positive_integer(&row.get(indexes.id).as_raw()).ok_or(RejectReason::InvalidId)?;
    if !seen_ids.insert(id) {
        return Err(RejectReason::DuplicateId);
    }
    Ok(())
}

/// Free-function form of [`RowValidator::validate`].
pub fn validate(table: Table, columns: &ColumnConfig) -> Result<Table> {
    RowValidator::new(columns.clone()).validate(table)
}

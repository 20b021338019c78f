use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT_FRACTIONAL: &str = "%Y-%m-%d %H:%M:%S%.f";

static EMPTY: Value = Value::Empty;

/// A single cell as read from, or written to, delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Empty,
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Value::Empty
        } else {
            Value::Text(field.to_string())
        }
    }

    /// The string form field-level checks operate on.
    pub fn as_raw(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(text) => f.write_str(text),
            Value::Timestamp(ts) if ts.nanosecond() == 0 => {
                write!(f, "{}", ts.format(TIMESTAMP_FORMAT))
            }
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT_FRACTIONAL)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line in the source file, 0 when the row was built in memory.
    pub line: u64,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { line: 0, values }
    }

    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&EMPTY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from string literals; empty strings become `Value::Empty`.
    pub fn from_strings(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|fields| Row::new(fields.iter().map(|f| Value::from_field(f)).collect()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| EtlError::schema(name, &self.columns))
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row.get(index)).collect())
    }

    /// Keeps only `names`, in the table's own column order. Every name must exist.
    pub fn project(self, names: &[&str]) -> Result<Table> {
        for name in names {
            self.column_index(name)?;
        }

        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| names.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();

        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| Row {
                line: row.line,
                values: keep.iter().map(|&i| row.get(i).clone()).collect(),
            })
            .collect();

        Ok(Table { columns, rows })
    }
}

/// Why the validator rejected a row. Only the first failing rule is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidTimestamp,
    InvalidSegment,
    InvalidTarget,
    InvalidId,
    DuplicateId,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::InvalidTimestamp => "invalid timestamp",
            RejectReason::InvalidSegment => "segment is not a positive integer",
            RejectReason::InvalidTarget => "target is not a positive integer",
            RejectReason::InvalidId => "id is not a positive integer",
            RejectReason::DuplicateId => "duplicate id",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub invalid_timestamp: usize,
    pub invalid_segment: usize,
    pub invalid_target: usize,
    pub invalid_id: usize,
    pub duplicate_id: usize,
}

impl ValidationSummary {
    pub fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::InvalidTimestamp => self.invalid_timestamp += 1,
            RejectReason::InvalidSegment => self.invalid_segment += 1,
            RejectReason::InvalidTarget => self.invalid_target += 1,
            RejectReason::InvalidId => self.invalid_id += 1,
            RejectReason::DuplicateId => self.duplicate_id += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.invalid_timestamp
            + self.invalid_segment
            + self.invalid_target
            + self.invalid_id
            + self.duplicate_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input_path: String,
    pub output_path: Option<String>,
    pub rows_read: usize,
    pub columns_dropped: Vec<String>,
    pub unparseable_timestamps: usize,
    pub validation: ValidationSummary,
    pub rows_written: usize,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.unparseable_timestamps + self.validation.total()
    }
}

#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub table: Table,
    pub report: CleaningReport,
}

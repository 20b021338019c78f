use crate::adapters::LocalStorage;
use crate::domain::model::{CleaningReport, Row, Table, Value};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_DELIMITER: u8 = b',';

/// Reads a comma-delimited file from the local filesystem.
pub fn load(path: impl AsRef<Path>) -> Result<Table> {
    load_from(&LocalStorage::new(), path.as_ref(), DEFAULT_DELIMITER)
}

/// Writes `table` as comma-delimited text, creating parent directories.
pub fn save(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    save_to(&LocalStorage::new(), table, path.as_ref(), DEFAULT_DELIMITER)
}

pub fn load_from<S: Storage>(storage: &S, path: &Path, delimiter: u8) -> Result<Table> {
    if !storage.exists(path) {
        return Err(EtlError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let data = storage.read_file(path)?;
    let table = parse_table(&data, delimiter)?;

    if table.is_empty() {
        return Err(EtlError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Parses delimited text with a header row. A header-only or blank input yields an empty table.
pub fn parse_table(data: &[u8], delimiter: u8) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let headers = rdr
        .headers()
        .map_err(|e| EtlError::format(format!("invalid header row: {}", e)))?
        .clone();

    let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
        return Ok(Table::default());
    }

    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(EtlError::format(format!("duplicate column name '{}'", column)));
        }
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| EtlError::format(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() > columns.len() {
            return Err(EtlError::format(format!(
                "line {}: expected {} fields, found {}",
                line,
                columns.len(),
                record.len()
            )));
        }

        let mut values: Vec<Value> = record.iter().map(Value::from_field).collect();
        values.resize(columns.len(), Value::Empty);
        rows.push(Row { line, values });
    }

    Ok(Table::new(columns, rows))
}

pub fn save_to<S: Storage>(storage: &S, table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let data = render_table(table, delimiter).map_err(|source| EtlError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    if table.is_empty() {
        tracing::warn!("Writing header-only output to {}", path.display());
    }

    storage.write_file(path, &data)
}

pub fn render_table(table: &Table, delimiter: u8) -> std::io::Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.values.iter().map(|v| v.to_string()))?;
    }

    wtr.into_inner().map_err(|e| e.into_error())
}

/// Writes the run summary as pretty-printed JSON.
pub fn save_report<S: Storage>(storage: &S, report: &CleaningReport, path: &Path) -> Result<()> {
    let data = serde_json::to_vec_pretty(report).map_err(|e| EtlError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    storage.write_file(path, &data)
}

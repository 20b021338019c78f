use crate::core::timestamp::parse_timestamp;
use crate::core::validator::parse_positive_integer;
use crate::domain::model::{Row, Table, Value};
use crate::utils::error::Result;
use std::cmp::Ordering;

/// Drops rows whose `time_column` is not a timestamp and converts the rest to
/// `Value::Timestamp`.
pub fn parse_timestamps(table: Table, time_column: &str) -> Result<Table> {
    let index = table.column_index(time_column)?;
    let Table { columns, rows } = table;
    let before = rows.len();

    let rows: Vec<Row> = rows
        .into_iter()
        .filter_map(|mut row| {
            let parsed = match row.get(index) {
                Value::Timestamp(ts) => Some(*ts),
                Value::Text(text) => parse_timestamp(text),
                Value::Empty => None,
            };
            match parsed {
                Some(ts) => {
                    if let Some(slot) = row.values.get_mut(index) {
                        *slot = Value::Timestamp(ts);
                    }
                    Some(row)
                }
                None => {
                    tracing::debug!(
                        "Removed row at line {}: unparseable {} {:?}",
                        row.line,
                        time_column,
                        row.get(index).as_raw()
                    );
                    None
                }
            }
        })
        .collect();

    let dropped = before - rows.len();
    if dropped > 0 {
        tracing::info!("Dropped {} rows with invalid '{}' values", dropped, time_column);
    }

    Ok(Table { columns, rows })
}

/// Keeps the three modeling columns, in the table's own column order.
pub fn select_columns(
    table: Table,
    segment_column: &str,
    time_column: &str,
    target_column: &str,
) -> Result<Table> {
    table.project(&[segment_column, time_column, target_column])
}

/// Stable sort by segment, then time, both ascending.
pub fn sort_by_segment_then_time(
    table: Table,
    segment_column: &str,
    time_column: &str,
) -> Result<Table> {
    let segment = table.column_index(segment_column)?;
    let time = table.column_index(time_column)?;
    let Table { columns, mut rows } = table;

    rows.sort_by(|a, b| {
        compare_segments(a.get(segment), b.get(segment))
            .then_with(|| compare_times(a.get(time), b.get(time)))
    });

    Ok(Table { columns, rows })
}

// Missing values sort after everything else.
fn compare_present<T: Ord>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}

fn empty_last(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        (false, false) => None,
    }
}

fn compare_segments(a: &Value, b: &Value) -> Ordering {
    if let Some(ordering) = empty_last(a, b) {
        return ordering;
    }
    let (raw_a, raw_b) = (a.as_raw(), b.as_raw());
    compare_present(parse_positive_integer(&raw_a), parse_positive_integer(&raw_b))
        .unwrap_or_else(|| raw_a.cmp(&raw_b))
}

fn as_timestamp(value: &Value) -> Option<chrono::NaiveDateTime> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Text(text) => parse_timestamp(text),
        Value::Empty => None,
    }
}

fn compare_times(a: &Value, b: &Value) -> Ordering {
    if let Some(ordering) = empty_last(a, b) {
        return ordering;
    }
    compare_present(as_timestamp(a), as_timestamp(b)).unwrap_or_else(|| a.as_raw().cmp(&b.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use chrono::NaiveDateTime;

    fn times(table: &Table, segment: &str) -> Vec<NaiveDateTime> {
        let seg = table.column_index("Junction").unwrap();
        let time = table.column_index("DateTime").unwrap();
        table
            .rows
            .iter()
            .filter(|row| row.get(seg).as_raw() == segment)
            .map(|row| match row.get(time) {
                Value::Timestamp(ts) => *ts,
                other => panic!("expected timestamp, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_parse_timestamps_drops_invalid_and_converts() {
        let mut table = Table::from_strings(
            &["Junction", "DateTime", "Vehicles"],
            &[
                &["1", "2021-01-01 00:00:00", "10"],
                &["1", "garbage", "11"],
                &["1", "", "12"],
                &["1", "2021-01-01 03:00:00", "13"],
                &["1", "2021-02-30 00:00:00", "14"],
            ],
        );
        for (i, row) in table.rows.iter_mut().enumerate() {
            row.line = i as u64 + 2;
        }

        let out = parse_timestamps(table, "DateTime").unwrap();

        assert_eq!(out.len(), 2);
        assert!(out
            .rows
            .iter()
            .all(|row| matches!(row.values[1], Value::Timestamp(_))));
        assert_eq!(out.rows[0].line, 2);
        assert_eq!(out.rows[1].line, 5);
        assert_eq!(out.rows[1].values[2], Value::Text("13".to_string()));
    }

    #[test]
    fn test_parse_timestamps_consecutive_invalid_rows() {
        let table = Table::from_strings(
            &["DateTime"],
            &[&["bad"], &["worse"], &["2021-01-01"], &["nope"], &["2021-01-02"]],
        );

        let out = parse_timestamps(table, "DateTime").unwrap();

        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_parse_timestamps_missing_column() {
        let table = Table::from_strings(&["timestamp"], &[&["2021-01-01"]]);
        let err = parse_timestamps(table, "DateTime").unwrap_err();
        assert!(matches!(err, EtlError::Schema { .. }));
    }

    #[test]
    fn test_select_columns_drops_extra_columns() {
        let table = Table::from_strings(
            &["ID", "Weather", "DateTime", "Junction", "SensorNote", "Vehicles"],
            &[&["1", "sunny", "2021-01-01 00:00:00", "1", "ok", "15"]],
        );

        let out = select_columns(table, "Junction", "DateTime", "Vehicles").unwrap();

        assert_eq!(out.columns, vec!["DateTime", "Junction", "Vehicles"]);
        assert_eq!(out.rows[0].values.len(), 3);
    }

    #[test]
    fn test_select_columns_missing_is_schema_error() {
        let table = Table::from_strings(
            &["timestamp", "segment_id", "volume", "row_id"],
            &[&["2021-01-01 00:00:00", "1", "5", "1"]],
        );

        let err = select_columns(table, "Junction", "DateTime", "Vehicles").unwrap_err();

        assert!(matches!(err, EtlError::Schema { .. }));
    }

    #[test]
    fn test_select_columns_alternate_schema() {
        let table = Table::from_strings(
            &["timestamp", "segment_id", "volume", "row_id"],
            &[&["2021-01-01 00:00:00", "1", "5", "1"]],
        );

        let out = select_columns(table, "segment_id", "timestamp", "volume").unwrap();

        assert_eq!(out.columns, vec!["timestamp", "segment_id", "volume"]);
    }

    #[test]
    fn test_sort_by_segment_then_time() {
        let table = Table::from_strings(
            &["Junction", "DateTime", "Vehicles"],
            &[
                &["2", "2021-01-01 02:00:00", "1"],
                &["10", "2021-01-01 00:00:00", "2"],
                &["1", "2021-01-01 01:00:00", "3"],
                &["2", "2021-01-01 00:00:00", "4"],
                &["1", "2020-12-31 23:00:00", "5"],
            ],
        );
        let table = parse_timestamps(table, "DateTime").unwrap();

        let out = sort_by_segment_then_time(table, "Junction", "DateTime").unwrap();

        let segments: Vec<String> = out.rows.iter().map(|r| r.values[0].as_raw()).collect();
        assert_eq!(segments, vec!["1", "1", "2", "2", "10"]);
        for segment in ["1", "2", "10"] {
            let seq = times(&out, segment);
            assert!(seq.windows(2).all(|w| w[0] <= w[1]), "segment {}", segment);
        }
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let table = Table::from_strings(
            &["Junction", "DateTime", "Vehicles"],
            &[
                &["1", "2021-01-01 00:00:00", "first"],
                &["1", "2021-01-01 00:00:00", "second"],
                &["1", "2020-01-01 00:00:00", "earlier"],
            ],
        );

        let out = sort_by_segment_then_time(table, "Junction", "DateTime").unwrap();

        let targets: Vec<String> = out.rows.iter().map(|r| r.values[2].as_raw()).collect();
        assert_eq!(targets, vec!["earlier", "first", "second"]);
    }

    #[test]
    fn test_sort_compares_text_timestamps_chronologically() {
        let table = Table::from_strings(
            &["Junction", "DateTime"],
            &[&["1", "02/01/2021 00:00"], &["1", "2021-01-15 00:00:00"], &["", "2020-01-01"]],
        );

        let out = sort_by_segment_then_time(table, "Junction", "DateTime").unwrap();

        let times: Vec<String> = out.rows.iter().map(|r| r.values[1].as_raw()).collect();
        assert_eq!(times, vec!["2021-01-15 00:00:00", "02/01/2021 00:00", "2020-01-01"]);
    }
}

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use super::model::{GasSeries, Reading};

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Shape problems in an otherwise readable CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file has no columns")]
    NoColumns,
    #[error("CSV has a 'Time' column but no value column")]
    NoValueColumn,
    #[error("column '{0}' contains no numeric values")]
    NoNumericValues(String),
    #[error("row {row}: cannot parse '{text}' as a date-time")]
    BadTimestamp { row: usize, text: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Name of the time column, as exported by Influx/Grafana.
pub const TIME_COLUMN: &str = "Time";

/// Load a gas-level series from a file.  Dispatch by extension.
pub fn load_file(path: &Path) -> Result<GasSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse and normalize a CSV export into a [`GasSeries`].
///
/// Layout: a header row with a `Time` column (any common date-time format)
/// plus one value column.  If `Time` exists, the first *other* column is the
/// value column; otherwise the first column is, and the readings carry no
/// timestamps.  The value column is renamed to the standard label on load.
///
/// Rows whose value cell fails numeric coercion are dropped.  A `Time` cell
/// that fails to parse is an error for the whole load.
pub fn load_csv<R: Read>(input: R) -> Result<GasSeries> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(LoadError::NoColumns.into());
    }

    let time_idx = headers.iter().position(|h| h == TIME_COLUMN);
    let value_idx = match time_idx {
        Some(t) => (0..headers.len())
            .find(|&i| i != t)
            .ok_or(LoadError::NoValueColumn)?,
        None => 0,
    };
    let source_column = headers[value_idx].clone();

    let mut readings = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        // Numeric coercion: unparseable values drop the row.  Rust parses
        // "NaN" as a float; treat it as a failed coercion too, like the
        // original's dropna.
        let value = match record.get(value_idx).map(str::trim) {
            Some(cell) if !cell.is_empty() => match cell.parse::<f64>() {
                Ok(v) if !v.is_nan() => v,
                _ => {
                    dropped += 1;
                    continue;
                }
            },
            _ => {
                dropped += 1;
                continue;
            }
        };

        let timestamp = match time_idx {
            Some(t) => {
                let cell = record.get(t).unwrap_or("").trim();
                Some(parse_timestamp(cell).ok_or_else(|| LoadError::BadTimestamp {
                    row: row_no,
                    text: cell.to_string(),
                })?)
            }
            None => None,
        };

        readings.push(Reading { timestamp, value });
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} non-numeric rows from column '{source_column}'");
    }

    if readings.is_empty() {
        return Err(LoadError::NoNumericValues(source_column).into());
    }

    Ok(GasSeries {
        readings,
        source_column,
    })
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Naive formats tried after RFC 3339; interpreted as UTC.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a date-time cell.  Accepts RFC 3339, the common naive formats
/// above, a bare date, and integer epoch seconds or milliseconds.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    // Epoch timestamps: 13+ digits are milliseconds, fewer are seconds.
    if let Ok(epoch) = s.parse::<i64>() {
        return if epoch.abs() >= 1_000_000_000_000 {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        };
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::VALUE_COLUMN;

    fn load_str(s: &str) -> Result<GasSeries> {
        load_csv(s.as_bytes())
    }

    #[test]
    fn time_column_detected_and_value_column_renamed() {
        let series = load_str(
            "Time,sensor_42\n\
             2024-05-01 10:00:00,1200\n\
             2024-05-01 10:01:00,1350.5\n",
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.has_timestamps());
        assert_eq!(series.source_column, "sensor_42");
        assert_eq!(VALUE_COLUMN, "nivel_gas");
        assert_eq!(series.readings[1].value, 1350.5);
    }

    #[test]
    fn non_numeric_rows_are_dropped() {
        let series = load_str(
            "Time,level\n\
             2024-05-01 10:00:00,100\n\
             2024-05-01 10:01:00,n/a\n\
             2024-05-01 10:02:00,\n\
             2024-05-01 10:03:00,300\n",
        )
        .unwrap();

        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![100.0, 300.0]);
    }

    #[test]
    fn missing_time_column_uses_first_column_without_timestamps() {
        let series = load_str("level,quality\n10,good\n20,bad\n").unwrap();

        assert!(!series.has_timestamps());
        assert_eq!(series.source_column, "level");
        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![10.0, 20.0]);
    }

    #[test]
    fn order_is_preserved_as_provided() {
        let series = load_str(
            "Time,level\n\
             2024-05-01 10:05:00,3\n\
             2024-05-01 10:00:00,1\n\
             2024-05-01 10:05:00,2\n",
        )
        .unwrap();

        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn nan_cells_are_dropped_like_failed_coercion() {
        let series = load_str(
            "Time,level\n\
             2024-05-01 10:00:00,100\n\
             2024-05-01 10:01:00,NaN\n\
             2024-05-01 10:02:00,300\n",
        )
        .unwrap();

        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![100.0, 300.0]);
        assert!(values.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn empty_input_reports_missing_columns() {
        let err = load_str("").unwrap_err();
        assert!(err.to_string().contains("no columns"));
    }

    #[test]
    fn lone_time_column_reports_missing_value_column() {
        let err = load_str("Time\n2024-05-01 10:00:00\n").unwrap_err();
        assert!(err.to_string().contains("no value column"));
    }

    #[test]
    fn no_numeric_values_is_an_error() {
        let err = load_str("Time,level\n2024-05-01 10:00:00,abc\n").unwrap_err();
        assert!(err.to_string().contains("no numeric values"));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let err = load_str("Time,level\nnot-a-date,100\n").unwrap_err();
        assert!(err.to_string().contains("date-time"));
    }

    #[test]
    fn accepted_timestamp_formats() {
        for s in [
            "2024-05-01T10:00:00Z",
            "2024-05-01T10:00:00+02:00",
            "2024-05-01 10:00:00",
            "2024-05-01 10:00:00.250",
            "2024-05-01",
            "1714557600",
            "1714557600000",
        ] {
            assert!(parse_timestamp(s).is_some(), "failed to parse {s:?}");
        }
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn epoch_seconds_and_millis_agree() {
        let secs = parse_timestamp("1714557600").unwrap();
        let millis = parse_timestamp("1714557600000").unwrap();
        assert_eq!(secs, millis);
    }
}

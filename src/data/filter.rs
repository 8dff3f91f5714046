use anyhow::{Context, Result};
use serde::Serialize;

use super::loader::TIME_COLUMN;
use super::model::{GasSeries, VALUE_COLUMN};

// ---------------------------------------------------------------------------
// Value-threshold filters
// ---------------------------------------------------------------------------

/// Fixed file name offered for the filtered-subset download.
pub const EXPORT_FILE_NAME: &str = "nivel_gas_filtrado.csv";

/// Indices of readings strictly greater than `threshold`, in file order.
pub fn indices_above(series: &GasSeries, threshold: f64) -> Vec<usize> {
    series
        .readings
        .iter()
        .enumerate()
        .filter(|(_, r)| r.value > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Indices of readings strictly less than `threshold`, in file order.
pub fn indices_below(series: &GasSeries, threshold: f64) -> Vec<usize> {
    series
        .readings
        .iter()
        .enumerate()
        .filter(|(_, r)| r.value < threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Whether filtering is meaningless because every value is identical.
/// The UI disables the sliders and shows the full table in that case.
pub fn is_degenerate(series: &GasSeries) -> bool {
    let mut values = series.values();
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

// Field names must match the loader's column names so exports re-load
// cleanly.

#[derive(Serialize)]
struct TimedRow<'a> {
    #[serde(rename = "Time")]
    time: &'a str,
    nivel_gas: f64,
}

#[derive(Serialize)]
struct ValueRow {
    nivel_gas: f64,
}

/// Serialize the selected readings to UTF-8 CSV bytes, same columns as the
/// on-screen table (`Time,nivel_gas`, or `nivel_gas` alone when the series
/// has no timestamps).
pub fn export_csv(series: &GasSeries, indices: &[usize]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // Serde only emits the header with the first row; keep it for empty
    // subsets too.
    if indices.is_empty() {
        let header: &[&str] = if series.has_timestamps() {
            &[TIME_COLUMN, VALUE_COLUMN]
        } else {
            &[VALUE_COLUMN]
        };
        writer.write_record(header).context("writing CSV header")?;
    }

    if series.has_timestamps() {
        for &i in indices {
            let reading = &series.readings[i];
            let time = reading
                .timestamp
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            writer
                .serialize(TimedRow {
                    time: &time,
                    nivel_gas: reading.value,
                })
                .context("writing CSV row")?;
        }
    } else {
        for &i in indices {
            writer
                .serialize(ValueRow {
                    nivel_gas: series.readings[i].value,
                })
                .context("writing CSV row")?;
        }
    }

    writer
        .into_inner()
        .context("flushing CSV export buffer")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv;
    use crate::data::model::Reading;
    use chrono::{Duration, TimeZone, Utc};

    fn series_of(values: &[f64]) -> GasSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        GasSeries {
            readings: values
                .iter()
                .enumerate()
                .map(|(i, &v)| Reading {
                    timestamp: Some(start + Duration::minutes(i as i64)),
                    value: v,
                })
                .collect(),
            source_column: "level".to_string(),
        }
    }

    #[test]
    fn strict_above_and_below() {
        let series = series_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let above: Vec<f64> = indices_above(&series, 3.0)
            .iter()
            .map(|&i| series.readings[i].value)
            .collect();
        assert_eq!(above, vec![4.0, 5.0]);

        let below: Vec<f64> = indices_below(&series, 3.0)
            .iter()
            .map(|&i| series.readings[i].value)
            .collect();
        assert_eq!(below, vec![1.0, 2.0]);
    }

    #[test]
    fn constant_series_is_degenerate() {
        assert!(is_degenerate(&series_of(&[7.0, 7.0, 7.0])));
        assert!(!is_degenerate(&series_of(&[7.0, 7.1])));
    }

    #[test]
    fn export_headers_match_table_columns() {
        let series = series_of(&[1.0, 2.0]);
        let bytes = export_csv(&series, &[0, 1]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Time,nivel_gas\n"));

        let no_time = GasSeries {
            readings: vec![Reading { timestamp: None, value: 1.0 }],
            source_column: "level".to_string(),
        };
        let bytes = export_csv(&no_time, &[0]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("nivel_gas\n"));
    }

    #[test]
    fn empty_subset_still_exports_the_header() {
        let series = series_of(&[1.0, 2.0]);
        let bytes = export_csv(&series, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), "Time,nivel_gas");
    }

    #[test]
    fn export_round_trips_through_the_loader() {
        let series = series_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let above = indices_above(&series, 2.5);
        let bytes = export_csv(&series, &above).unwrap();

        let reparsed = load_csv(bytes.as_slice()).unwrap();
        assert_eq!(reparsed.len(), above.len());
        let expected: Vec<f64> = above.iter().map(|&i| series.readings[i].value).collect();
        let actual: Vec<f64> = reparsed.values().collect();
        assert_eq!(actual, expected);
        assert!(reparsed.has_timestamps());
    }
}

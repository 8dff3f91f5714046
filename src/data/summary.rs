use chrono::Duration;

use super::model::{GasSeries, GasState};

// ---------------------------------------------------------------------------
// Summary – descriptive statistics of a loaded series
// ---------------------------------------------------------------------------

/// Derived statistics, recomputed from the series on every load.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Last value in file order ("current" gas level).
    pub current: f64,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); 0.0 for a single reading.
    pub std: f64,
    /// Quartiles: 25th percentile, median, 75th percentile.
    pub quartiles: [f64; 3],
    /// Last timestamp minus first; `None` with fewer than two timestamped
    /// readings.
    pub elapsed: Option<Duration>,
}

/// Compute the summary of a non-empty series.  Pure function of the data.
pub fn summarize(series: &GasSeries) -> Summary {
    debug_assert!(!series.is_empty());

    let n = series.len();
    let current = series.readings[n - 1].value;
    let max = series.values().fold(f64::NEG_INFINITY, f64::max);
    let min = series.values().fold(f64::INFINITY, f64::min);
    let mean = series.values().sum::<f64>() / n as f64;

    let std = if n > 1 {
        let ss: f64 = series.values().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    let mut sorted: Vec<f64> = series.values().collect();
    sorted.sort_by(f64::total_cmp);
    let quartiles = [
        quantile(&sorted, 0.25),
        quantile(&sorted, 0.50),
        quantile(&sorted, 0.75),
    ];

    let elapsed = match (series.readings.first(), series.readings.last()) {
        (Some(first), Some(last)) if n > 1 => match (first.timestamp, last.timestamp) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        },
        _ => None,
    };

    Summary {
        count: n,
        current,
        max,
        min,
        mean,
        std,
        quartiles,
        elapsed,
    }
}

/// Linearly-interpolated quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Classification & threshold alert
// ---------------------------------------------------------------------------

/// Classify the current level against mean ± one standard deviation.
pub fn classify(summary: &Summary) -> GasState {
    if summary.current > summary.mean + summary.std {
        GasState::High
    } else if summary.current < summary.mean - summary.std {
        GasState::Low
    } else {
        GasState::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdAlert {
    Exceeds,
    Below,
}

/// Compare the current level against the user-configured alert threshold.
/// No alert state is stored; the result is re-derived each render.
pub fn threshold_alert(current: f64, threshold: f64) -> ThresholdAlert {
    if current >= threshold {
        ThresholdAlert::Exceeds
    } else {
        ThresholdAlert::Below
    }
}

// ---------------------------------------------------------------------------
// Duration formatting
// ---------------------------------------------------------------------------

/// Render the elapsed duration as `"N days HH:MM:SS"` (days omitted when
/// zero), or `"unavailable"` when it could not be derived.
pub fn format_elapsed(elapsed: Option<Duration>) -> String {
    let Some(d) = elapsed else {
        return "unavailable".to_string();
    };

    let total_secs = d.num_seconds();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let mins = (total_secs % 3_600) / 60;
    let secs = total_secs % 60;

    if days > 0 {
        format!("{days} days {hours:02}:{mins:02}:{secs:02}")
    } else {
        format!("{hours:02}:{mins:02}:{secs:02}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Reading;
    use chrono::{TimeZone, Utc};

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
    fn single_reading_has_zero_std_and_no_elapsed() {
        let s = summarize(&series_of(&[42.0]));
        assert_eq!(s.std, 0.0);
        assert_eq!(s.elapsed, None);
        assert_eq!(format_elapsed(s.elapsed), "unavailable");
        assert_eq!(s.current, 42.0);
        assert_eq!(s.quartiles, [42.0, 42.0, 42.0]);
    }

    #[test]
    fn basic_statistics() {
        let s = summarize(&series_of(&[10.0, 10.0, 10.0, 100.0]));
        assert_eq!(s.current, 100.0);
        assert_eq!(s.max, 100.0);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.mean, 32.5);
        assert_eq!(s.std, 45.0); // sqrt((3*22.5² + 67.5²) / 3)
        assert_eq!(s.elapsed, Some(Duration::minutes(3)));
    }

    #[test]
    fn classification_high_when_last_above_mean_plus_std() {
        let s = summarize(&series_of(&[10.0, 10.0, 10.0, 100.0]));
        assert!(s.current > s.mean + s.std);
        assert_eq!(classify(&s), GasState::High);
    }

    #[test]
    fn classification_low_when_last_below_mean_minus_std() {
        let s = summarize(&series_of(&[100.0, 100.0, 100.0, 10.0]));
        assert_eq!(classify(&s), GasState::Low);
    }

    #[test]
    fn classification_normal_within_one_std() {
        let s = summarize(&series_of(&[10.0, 20.0, 30.0, 20.0]));
        assert_eq!(classify(&s), GasState::Normal);
    }

    #[test]
    fn elapsed_absent_without_timestamps() {
        let series = GasSeries {
            readings: vec![
                Reading { timestamp: None, value: 1.0 },
                Reading { timestamp: None, value: 2.0 },
            ],
            source_column: "level".to_string(),
        };
        assert_eq!(summarize(&series).elapsed, None);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let s = summarize(&series_of(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(s.quartiles, [1.75, 2.5, 3.25]);
    }

    #[test]
    fn threshold_alert_matches_original_semantics() {
        assert_eq!(threshold_alert(3500.0, 3000.0), ThresholdAlert::Exceeds);
        assert_eq!(threshold_alert(2000.0, 3000.0), ThresholdAlert::Below);
        assert_eq!(threshold_alert(3000.0, 3000.0), ThresholdAlert::Exceeds);
    }

    #[test]
    fn elapsed_formatting_carries_days() {
        assert_eq!(
            format_elapsed(Some(Duration::seconds(2 * 86_400 + 3_661))),
            "2 days 01:01:01"
        );
        assert_eq!(format_elapsed(Some(Duration::seconds(59))), "00:00:59");
    }
}

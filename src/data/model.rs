use std::fmt;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Reading – one row of the source CSV
// ---------------------------------------------------------------------------

/// A single sensor reading (one row of the normalized table).
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Sample timestamp. `None` when the source file had no `Time` column.
    pub timestamp: Option<DateTime<Utc>>,
    /// Gas level in the sensor's relative unit.
    pub value: f64,
}

// ---------------------------------------------------------------------------
// GasSeries – the complete loaded series
// ---------------------------------------------------------------------------

/// Standard label the value column is renamed to during normalization.
/// Also the column header used on export.
pub const VALUE_COLUMN: &str = "nivel_gas";

/// The normalized series, kept in file order (no re-sort, duplicate
/// timestamps allowed).
#[derive(Debug, Clone)]
pub struct GasSeries {
    pub readings: Vec<Reading>,
    /// Header the value column carried before it was renamed.
    pub source_column: String,
}

impl GasSeries {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Whether the series carries timestamps (source had a `Time` column).
    pub fn has_timestamps(&self) -> bool {
        self.readings.first().is_some_and(|r| r.timestamp.is_some())
    }

    /// Values in file order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.value)
    }
}

// ---------------------------------------------------------------------------
// GasState – classification of the current level
// ---------------------------------------------------------------------------

/// Position of the last reading relative to mean ± one standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasState {
    High,
    Normal,
    Low,
}

impl fmt::Display for GasState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasState::High => write!(f, "High"),
            GasState::Normal => write!(f, "Normal"),
            GasState::Low => write!(f, "Low"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChartKind – user-selected chart style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Area, ChartKind::Scatter];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Area => "Area",
            ChartKind::Scatter => "Scatter",
        }
    }
}

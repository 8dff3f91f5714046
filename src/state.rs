use crate::data::model::{ChartKind, GasSeries};
use crate::data::summary::{Summary, summarize};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard tabs, mirroring the sections of the original report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Statistics,
    Filter,
    SiteInfo,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Statistics, Tab::Filter, Tab::SiteInfo];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Statistics => "Statistics",
            Tab::Filter => "Filter & export",
            Tab::SiteInfo => "Site info",
        }
    }
}

/// The loaded series plus its derived statistics.  Rebuilt as a whole on
/// every load; nothing survives a re-load.
pub struct LoadedData {
    pub series: GasSeries,
    pub summary: Summary,
}

/// User-adjustable controls, session-scoped.
pub struct Controls {
    /// Selected chart style.
    pub chart_kind: ChartKind,
    /// Alert threshold for the current gas level.
    pub alert_threshold: f64,
    /// Lower slider: keep readings strictly greater than this.
    pub filter_above: f64,
    /// Upper slider: keep readings strictly less than this.
    pub filter_below: f64,
    /// Whether the raw table is shown under the chart.
    pub show_raw: bool,
    /// Active dashboard tab.
    pub tab: Tab,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            chart_kind: ChartKind::default(),
            alert_threshold: 3000.0,
            filter_above: 0.0,
            filter_below: 0.0,
            show_raw: false,
            tab: Tab::default(),
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded data (None until the user opens a file).
    pub data: Option<LoadedData>,

    pub controls: Controls,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded series; derive statistics and reset the
    /// filter sliders to the mean.
    pub fn set_series(&mut self, series: GasSeries) {
        let summary = summarize(&series);
        self.controls.filter_above = summary.mean;
        self.controls.filter_below = summary.mean;
        self.controls.show_raw = false;
        self.data = Some(LoadedData { series, summary });
        self.status_message = None;
    }
}

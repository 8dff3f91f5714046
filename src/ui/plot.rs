use chrono::DateTime;
use eframe::egui::{Color32, Ui};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::data::model::{ChartKind, GasSeries, VALUE_COLUMN};

// ---------------------------------------------------------------------------
// Time-series chart (overview tab)
// ---------------------------------------------------------------------------

/// Emerald, matching the original report's trace colour.
const SERIES_COLOR: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);

/// Render the gas-level chart in the selected style.
pub fn series_chart(ui: &mut Ui, series: &GasSeries, kind: ChartKind) {
    let has_time = series.has_timestamps();

    // x is the epoch second, or the sample index when there is no Time column.
    let points: PlotPoints = series
        .readings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let x = r
                .timestamp
                .map(|t| t.timestamp() as f64)
                .unwrap_or(i as f64);
            [x, r.value]
        })
        .collect();

    let mut plot = Plot::new("gas_plot")
        .legend(Legend::default())
        .height(420.0)
        .x_axis_label(if has_time { "Time" } else { "Sample" })
        .y_axis_label("Gas level")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |_name, point: &PlotPoint| {
            if has_time {
                format!("{}\n{VALUE_COLUMN}: {:.1}", hover_time(point.x), point.y)
            } else {
                format!(
                    "sample {}\n{VALUE_COLUMN}: {:.1}",
                    point.x.round() as i64,
                    point.y
                )
            }
        });

    if has_time {
        plot = plot.x_axis_formatter(|mark: GridMark, _range| tick_time(mark.value));
    }

    plot.show(ui, |plot_ui| match kind {
        ChartKind::Line => {
            plot_ui.line(
                Line::new(points)
                    .name(VALUE_COLUMN)
                    .color(SERIES_COLOR)
                    .width(1.5),
            );
        }
        ChartKind::Area => {
            plot_ui.line(
                Line::new(points)
                    .name(VALUE_COLUMN)
                    .color(SERIES_COLOR)
                    .width(1.5)
                    .fill(0.0),
            );
        }
        ChartKind::Scatter => {
            plot_ui.points(
                Points::new(points)
                    .name(VALUE_COLUMN)
                    .color(SERIES_COLOR)
                    .radius(2.5),
            );
        }
    });
}

// -- Axis / hover time formatting --

fn tick_time(epoch_secs: f64) -> String {
    DateTime::from_timestamp(epoch_secs as i64, 0)
        .map(|t| t.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn hover_time(epoch_secs: f64) -> String {
    DateTime::from_timestamp(epoch_secs as i64, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

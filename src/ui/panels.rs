use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::{EXPORT_FILE_NAME, export_csv, indices_above, indices_below, is_degenerate};
use crate::data::model::{ChartKind, GasSeries, GasState, VALUE_COLUMN};
use crate::data::summary::{Summary, ThresholdAlert, classify, format_elapsed, threshold_alert};
use crate::state::{AppState, Controls, LoadedData, Tab};
use crate::ui::plot;

const WARN_COLOR: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);
const OK_COLOR: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(data) = &state.data {
            ui.label(format!(
                "{} readings loaded (from column '{}')",
                data.series.len(),
                data.series.source_column
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – data input and chart controls
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Gas level monitor");
    ui.label(
        RichText::new("Universidad EAFIT – sensor CSV exports from Influx/Grafana")
            .small()
            .weak(),
    );
    ui.separator();

    ui.strong("Data input");
    if ui.button("Open CSV…").clicked() {
        open_file_dialog(state);
    }
    ui.separator();

    ui.strong("Chart");
    for kind in ChartKind::ALL {
        ui.radio_value(&mut state.controls.chart_kind, kind, kind.label());
    }
    ui.separator();

    ui.strong("Alert threshold");
    ui.add(
        egui::DragValue::new(&mut state.controls.alert_threshold)
            .speed(100.0)
            .fixed_decimals(0),
    );
    ui.label(RichText::new("Gas level that triggers the alert banner.").small().weak());
}

// ---------------------------------------------------------------------------
// Central panel – metric cards, alert banner, tabs
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(data) = &state.data else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a gas-level CSV to start the analysis  (File → Open…)");
        });
        return;
    };

    metric_cards(ui, &data.summary);
    ui.add_space(8.0);
    alert_banner(ui, data.summary.current, state.controls.alert_threshold);
    ui.add_space(8.0);

    // ---- Tab bar ----
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.controls.tab, tab, tab.label());
        }
    });
    ui.separator();

    match state.controls.tab {
        Tab::Overview => overview_tab(ui, data, &mut state.controls),
        Tab::Statistics => statistics_tab(ui, &data.summary),
        Tab::Filter => filter_tab(ui, data, &mut state.controls, &mut state.status_message),
        Tab::SiteInfo => site_info_tab(ui),
    }
}

// -- Metric cards row --

fn metric_cards(ui: &mut Ui, summary: &Summary) {
    let state = classify(summary);
    let state_color = match state {
        GasState::High => Color32::RED,
        GasState::Normal => OK_COLOR,
        GasState::Low => WARN_COLOR,
    };

    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Current gas level", &fmt_metric(summary.current), |ui| {
            ui.label(RichText::new(format!("State: {state}")).color(state_color).small());
        });
        metric_card(&mut cols[1], "Recorded maximum", &fmt_metric(summary.max), |ui| {
            ui.label(RichText::new("Highest peak of the period").small().weak());
        });
        metric_card(&mut cols[2], "Mean", &fmt_metric(summary.mean), |ui| {
            ui.label(RichText::new("Average level over the interval").small().weak());
        });
        metric_card(&mut cols[3], "Recording span", &format_elapsed(summary.elapsed), |ui| {
            ui.label(RichText::new("First to last sample").small().weak());
        });
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str, footer: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label.to_uppercase()).small().weak());
            ui.label(RichText::new(value).heading());
            footer(ui);
        });
    });
}

// -- Threshold alert banner --

fn alert_banner(ui: &mut Ui, current: f64, threshold: f64) {
    match threshold_alert(current, threshold) {
        ThresholdAlert::Exceeds => {
            ui.colored_label(
                WARN_COLOR,
                format!(
                    "⚠ Current gas level ({}) exceeds the configured threshold ({}).",
                    fmt_metric(current),
                    fmt_metric(threshold)
                ),
            );
        }
        ThresholdAlert::Below => {
            ui.colored_label(
                OK_COLOR,
                format!(
                    "✔ Current gas level ({}) is below the configured threshold ({}).",
                    fmt_metric(current),
                    fmt_metric(threshold)
                ),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tab bodies
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, data: &LoadedData, controls: &mut Controls) {
    section_header(
        ui,
        "Gas level over time",
        "Zoom, drag, and hover over the chart to inspect exact values.",
    );

    plot::series_chart(ui, &data.series, controls.chart_kind);

    ui.checkbox(&mut controls.show_raw, "Show raw data");
    if controls.show_raw {
        let rows: Vec<usize> = (0..data.series.len()).collect();
        readings_table(ui, "raw_table", &data.series, &rows);
    }
}

fn statistics_tab(ui: &mut Ui, summary: &Summary) {
    section_header(
        ui,
        "Statistical summary",
        "Descriptive statistics of the gas level measured by the sensor.",
    );

    ui.columns(2, |cols: &mut [Ui]| {
        describe_table(&mut cols[0], summary);

        let right = &mut cols[1];
        right.label(RichText::new("Mean").small().weak());
        right.label(RichText::new(format!("{:.2}", summary.mean)).heading());
        right.label(RichText::new("Maximum").small().weak());
        right.label(RichText::new(format!("{:.2}", summary.max)).heading());
        right.label(RichText::new("Minimum").small().weak());
        right.label(RichText::new(format!("{:.2}", summary.min)).heading());
        right.label(RichText::new("Standard deviation").small().weak());
        right.label(RichText::new(format!("{:.2}", summary.std)).heading());
    });
}

fn describe_table(ui: &mut Ui, summary: &Summary) {
    let rows: [(&str, String); 8] = [
        ("count", summary.count.to_string()),
        ("mean", format!("{:.2}", summary.mean)),
        ("std", format!("{:.2}", summary.std)),
        ("min", format!("{:.2}", summary.min)),
        ("25%", format!("{:.2}", summary.quartiles[0])),
        ("50%", format!("{:.2}", summary.quartiles[1])),
        ("75%", format!("{:.2}", summary.quartiles[2])),
        ("max", format!("{:.2}", summary.max)),
    ];

    ui.push_id("describe_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(80.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Statistic");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong(VALUE_COLUMN);
                });
            })
            .body(|mut body| {
                for (name, value) in &rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(*name);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    });
                }
            });
    });
}

fn filter_tab(
    ui: &mut Ui,
    data: &LoadedData,
    controls: &mut Controls,
    status_message: &mut Option<String>,
) {
    section_header(
        ui,
        "Filters on the gas level",
        "Keep only readings matching a value criterion and export the result.",
    );

    let series = &data.series;
    let summary = &data.summary;

    if is_degenerate(series) {
        ui.colored_label(
            WARN_COLOR,
            format!("⚠ Every value in the dataset equals {:.2}.", summary.min),
        );
        ui.label("Filtering is disabled when the data has no variation.");
        let rows: Vec<usize> = (0..series.len()).collect();
        readings_table(ui, "degenerate_table", series, &rows);
        return;
    }

    let range = summary.min..=summary.max;
    let above = indices_above(series, controls.filter_above);
    let below = indices_below(series, controls.filter_below);

    ui.columns(2, |cols: &mut [Ui]| {
        let left = &mut cols[0];
        left.add(
            egui::Slider::new(&mut controls.filter_above, range.clone())
                .text("keep above"),
        );
        left.label(format!(
            "{} readings strictly greater than {:.2}:",
            above.len(),
            controls.filter_above
        ));
        readings_table(left, "above_table", series, &above);

        let right = &mut cols[1];
        right.add(
            egui::Slider::new(&mut controls.filter_below, range)
                .text("keep below"),
        );
        right.label(format!(
            "{} readings strictly less than {:.2}:",
            below.len(),
            controls.filter_below
        ));
        readings_table(right, "below_table", series, &below);
    });

    ui.add_space(8.0);
    ui.strong("Download filtered data (above-threshold subset)");
    if ui.button("💾 Save filtered CSV…").clicked() {
        export_filtered(series, &above, status_message);
    }
}

fn site_info_tab(ui: &mut Ui) {
    section_header(
        ui,
        "Measurement site and system details",
        "Context about the sensor and the environment where gas level is measured.",
    );

    ui.columns(2, |cols: &mut [Ui]| {
        let left = &mut cols[0];
        left.strong("📍 Sensor location");
        left.label("Universidad EAFIT – Medellín, Colombia");
        left.label("• Latitude: 6.2006");
        left.label("• Longitude: -75.5783");
        left.label("• Altitude: ~1,495 m a.s.l.");
        left.label("• Environment: university campus");

        let right = &mut cols[1];
        right.strong("🧪 System details");
        right.label("• Controller: ESP32");
        right.label("• Measured variable: gas level (sensor relative unit)");
        right.label("• Sampling rate: per Influx/Grafana configuration");
        right.label("• Data flow: Sensor → InfluxDB → Grafana → CSV → this viewer");
    });
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

fn section_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.strong(title);
    ui.label(RichText::new(subtitle).small().weak());
    ui.add_space(6.0);
}

/// Render selected readings as a two-column table (`Time` is replaced by
/// the sample index when the series has no timestamps).
fn readings_table(ui: &mut Ui, id_salt: &str, series: &GasSeries, rows: &[usize]) {
    let has_time = series.has_timestamps();

    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(260.0)
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(if has_time { "Time" } else { "#" });
                });
                header.col(|ui: &mut Ui| {
                    ui.strong(VALUE_COLUMN);
                });
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let idx = rows[row.index()];
                    let reading = &series.readings[idx];
                    row.col(|ui: &mut Ui| {
                        match reading.timestamp {
                            Some(t) => {
                                ui.label(t.format("%Y-%m-%d %H:%M:%S").to_string());
                            }
                            None => {
                                ui.label(idx.to_string());
                            }
                        };
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2}", reading.value));
                    });
                });
            });
    });
}

/// Thousands-grouped rendering for the metric cards, like the original
/// report's `{:,.0f}`.
fn fmt_metric(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let n = value.round() as i64;
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open gas-level data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(series) => {
                log::info!(
                    "Loaded {} readings (value column '{}')",
                    series.len(),
                    series.source_column
                );
                state.set_series(series);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!(
                    "Error: {e:#}. Expected a 'Time' column and a numeric gas-level column."
                ));
            }
        }
    }
}

fn export_filtered(series: &GasSeries, indices: &[usize], status_message: &mut Option<String>) {
    let bytes = match export_csv(series, indices) {
        Ok(b) => b,
        Err(e) => {
            log::error!("Failed to serialize filtered CSV: {e:#}");
            *status_message = Some(format!("Error: {e:#}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Save filtered CSV")
        .set_file_name(EXPORT_FILE_NAME)
        .save_file();

    if let Some(path) = file {
        match std::fs::write(&path, bytes) {
            Ok(()) => {
                log::info!("Exported {} filtered readings to {}", indices.len(), path.display());
                *status_message = Some(format!(
                    "Saved {} readings to {}",
                    indices.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", path.display());
                *status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fmt_metric;

    #[test]
    fn metric_formatting_groups_thousands() {
        assert_eq!(fmt_metric(0.0), "0");
        assert_eq!(fmt_metric(999.4), "999");
        assert_eq!(fmt_metric(2_400.6), "2,401");
        assert_eq!(fmt_metric(1_234_567.0), "1,234,567");
        assert_eq!(fmt_metric(-12_345.0), "-12,345");
    }

    #[test]
    fn metric_formatting_passes_non_finite_through() {
        assert_eq!(fmt_metric(f64::NAN), "NaN");
        assert_eq!(fmt_metric(f64::INFINITY), "inf");
        assert_eq!(fmt_metric(f64::NEG_INFINITY), "-inf");
    }
}

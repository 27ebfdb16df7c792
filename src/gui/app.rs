//! Comparison window
//! Shows the line chart (and optional statistics table) until closed.

use crate::charts::{ChartPlotter, PlottedSeries};
use crate::config::ChartSpec;
use crate::data::GroupedTable;
use crate::stats::SeriesStats;
use eframe::egui;

/// 12 x 6 inch figure at 100 dpi.
const WINDOW_SIZE: [f32; 2] = [1200.0, 600.0];
const WINDOW_SIZE_WITH_STATS: [f32; 2] = [1200.0, 780.0];

/// Main application window.
pub struct ComparisonApp {
    spec: ChartSpec,
    series: Vec<PlottedSeries>,
    stats: Option<Vec<SeriesStats>>,
}

impl ComparisonApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        spec: ChartSpec,
        series: Vec<PlottedSeries>,
        stats: Option<Vec<SeriesStats>>,
    ) -> Self {
        Self {
            spec,
            series,
            stats,
        }
    }
}

impl eframe::App for ComparisonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(stats) = &self.stats {
            egui::TopBottomPanel::bottom("stats_panel")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add_space(6.0);
                    ChartPlotter::draw_stats_table(ui, &self.spec.x_label, stats);
                    ui.add_space(6.0);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ChartPlotter::draw_line_chart(ui, &self.spec, &self.series);
        });
    }
}

/// Open the chart window; returns once the user closes it.
pub fn present(
    table: &GroupedTable,
    spec: &ChartSpec,
    stats: Option<Vec<SeriesStats>>,
) -> eframe::Result<()> {
    let series = ChartPlotter::build_series(table, spec);
    let size = if stats.is_some() {
        WINDOW_SIZE_WITH_STATS
    } else {
        WINDOW_SIZE
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_min_inner_size([600.0, 300.0])
            .with_title(&spec.title),
        ..Default::default()
    };

    log::info!("Showing {} series for {} groups", series.len(), table.len());

    let app_name = spec.title.clone();
    let spec = spec.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| Ok(Box::new(ComparisonApp::new(cc, spec, series, stats)))),
    )
}

//! Chart Plotter Module
//! Draws the algorithm comparison line chart using egui_plot.

use crate::config::{ChartSpec, SeriesMarker};
use crate::data::GroupedTable;
use crate::stats::SeriesStats;
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

/// Series colours, matplotlib's default cycle.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
    Color32::from_rgb(227, 119, 194), // Pink
    Color32::from_rgb(127, 127, 127), // Grey
    Color32::from_rgb(188, 189, 34),  // Olive
    Color32::from_rgb(23, 190, 207),  // Cyan
];

const LINE_WIDTH: f32 = 1.5;
const MARKER_RADIUS: f32 = 4.0;

/// One series resolved against the grouped data.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    pub label: String,
    pub marker: SeriesMarker,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    pub fn marker_shape(marker: SeriesMarker) -> MarkerShape {
        match marker {
            SeriesMarker::Circle => MarkerShape::Circle,
            SeriesMarker::Square => MarkerShape::Square,
            SeriesMarker::Triangle => MarkerShape::Up,
            SeriesMarker::Diamond => MarkerShape::Diamond,
        }
    }

    /// Pair every configured series with its `(key, mean)` points.
    /// Series whose column is not in the table are skipped.
    pub fn build_series(table: &GroupedTable, spec: &ChartSpec) -> Vec<PlottedSeries> {
        spec.series
            .iter()
            .enumerate()
            .filter_map(|(i, series)| {
                let Some(points) = table.points(&series.column) else {
                    log::warn!("Column '{}' not in grouped data, skipping", series.column);
                    return None;
                };
                log::debug!(
                    "Series '{}' ({} markers, {} points)",
                    series.label,
                    series.marker,
                    points.len()
                );
                Some(PlottedSeries {
                    label: series.label.clone(),
                    marker: series.marker,
                    color: Self::series_color(i),
                    points,
                })
            })
            .collect()
    }

    /// Draw the titled line chart: one line plus markers per series,
    /// axis labels, legend and grid.
    pub fn draw_line_chart(ui: &mut egui::Ui, spec: &ChartSpec, series: &[PlottedSeries]) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&spec.title).size(18.0).strong());
        });
        ui.add_space(6.0);

        Plot::new("comparison_chart")
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .show_grid(true)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for s in series {
                    // Same name on line and points gives one legend entry
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(s.points.iter().copied()))
                            .color(s.color)
                            .width(LINE_WIDTH)
                            .name(&s.label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(s.points.iter().copied()))
                            .shape(Self::marker_shape(s.marker))
                            .radius(MARKER_RADIUS)
                            .filled(true)
                            .color(s.color)
                            .name(&s.label),
                    );
                }
            });
    }

    /// Draw statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, key_label: &str, stats: &[SeriesStats]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("series_stats_table")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        let best_header = format!("Min at {key_label}");
                        for header in ["Series", "N", "Mean", "Median", "Std", "Min", "Max"]
                            .into_iter()
                            .chain([best_header.as_str()])
                        {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, s) in stats.iter().enumerate() {
                            ui.label(
                                RichText::new(&s.label)
                                    .size(11.0)
                                    .color(Self::series_color(i)),
                            )
                            .on_hover_text(s.column.as_str());
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            for v in [s.mean, s.median, s.std, s.min, s.max] {
                                ui.label(RichText::new(format!("{:.3}", v)).size(11.0));
                            }
                            match s.min_at {
                                Some(k) => ui.label(RichText::new(format!("{k}")).size(11.0)),
                                None => ui.label(RichText::new("-").size(11.0)),
                            };
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;
    use polars::prelude::*;

    #[test]
    fn series_follow_spec_with_palette_and_markers() {
        let df = df!(
            "cloudlets" => [20i64, 10, 10],
            "ga_fitness" => [5.0, 1.0, 3.0],
            "seq_fitness" => [6.0, 2.0, 4.0]
        )
        .unwrap();
        let spec = ChartSpec::for_metric("fitness", &["ga", "seq"], "cloudlets");
        let table =
            DataProcessor::group_mean(&df, "cloudlets", &spec.metric_columns()).unwrap();

        let series = ChartPlotter::build_series(&table, &spec);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Genetic Algorithm (GA)");
        assert_eq!(series[0].points, vec![[10.0, 2.0], [20.0, 5.0]]);
        assert_eq!(series[0].color, PALETTE[0]);
        assert_eq!(series[1].marker, SeriesMarker::Square);
        assert_eq!(series[1].points, vec![[10.0, 3.0], [20.0, 6.0]]);
        assert_eq!(series[1].color, PALETTE[1]);
    }

    #[test]
    fn missing_series_column_is_skipped() {
        let df = df!(
            "cloudlets" => [10i64],
            "ga_fitness" => [1.0]
        )
        .unwrap();
        let table = DataProcessor::group_mean(&df, "cloudlets", &["ga_fitness"]).unwrap();

        let series = ChartPlotter::build_series(&table, &ChartSpec::default());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Genetic Algorithm (GA)");
    }

    #[test]
    fn markers_map_to_plot_shapes() {
        assert_eq!(
            ChartPlotter::marker_shape(SeriesMarker::Triangle),
            MarkerShape::Up
        );
        assert_eq!(
            ChartPlotter::marker_shape(SeriesMarker::Diamond),
            MarkerShape::Diamond
        );
        assert_eq!(ChartPlotter::series_color(10), PALETTE[0]);
    }
}

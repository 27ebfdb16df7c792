//! Statistics Calculator Module
//! Descriptive statistics of each plotted series across the grouped keys.

use crate::config::ChartSpec;
use crate::data::GroupedTable;
use statrs::statistics::Statistics;

/// Statistics for a single series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub label: String,
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Key of the group holding `min`.
    pub min_at: Option<f64>,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            label: String::new(),
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            min_at: None,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    /// NaN entries (groups with no data) are ignored.
    pub fn compute_descriptive_stats(values: &[f64]) -> SeriesStats {
        let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = clean.len();
        if n == 0 {
            return SeriesStats::default();
        }

        let mut sorted = clean.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let std = if n > 1 { clean.iter().std_dev() } else { 0.0 };

        SeriesStats {
            count: n,
            mean: clean.iter().mean(),
            median: Self::percentile(&sorted, 50.0),
            std,
            min: Statistics::min(clean.iter()),
            max: Statistics::max(clean.iter()),
            ..SeriesStats::default()
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// One entry per series of `spec` present in `table`, in series order.
    pub fn summarize(table: &GroupedTable, spec: &ChartSpec) -> Vec<SeriesStats> {
        spec.series
            .iter()
            .filter_map(|series| {
                let means = table.metric(&series.column)?;
                let mut stats = Self::compute_descriptive_stats(means);
                stats.label = series.label.clone();
                stats.column = series.column.clone();
                stats.min_at = means
                    .iter()
                    .zip(table.keys())
                    .filter(|(v, _)| !v.is_nan())
                    .min_by(|(a, _), (b, _)| a.total_cmp(b))
                    .map(|(_, &k)| k);
                Some(stats)
            })
            .collect()
    }
}

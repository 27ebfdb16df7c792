//! Chart configuration
//! Which columns to plot, their legend labels and markers, and the figure text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_GROUP_COLUMN: &str = "cloudlets";
pub const DEFAULT_METRIC: &str = "fitness";
pub const DEFAULT_ALGORITHMS: [&str; 4] = ["ga", "seq", "fwa", "woa"];

/// Metric families written by the experiment drivers, as `<alg>_<suffix>`.
pub const METRIC_FAMILIES: [(&str, &str); 8] = [
    ("fitness", "Fitness"),
    ("time", "Time"),
    ("cpu_util", "CPU Utilization"),
    ("ram_util", "RAM Utilization"),
    ("bw_util", "Bandwidth Utilization"),
    ("power", "Power"),
    ("cpu_mean", "CPU Mean"),
    ("cpu_std", "CPU Std"),
];

const ALGORITHM_NAMES: [(&str, &str); 10] = [
    ("ga", "Genetic Algorithm (GA)"),
    ("seq", "Sequential Algorithm"),
    ("fwa", "Fireworks Algorithm (FWA)"),
    ("woa", "Whale Optimization Algorithm (WOA)"),
    ("csa", "Crow Search Algorithm (CSA)"),
    ("pso", "Particle Swarm Optimization (PSO)"),
    ("aco", "Ant Colony Optimization (ACO)"),
    ("wgoa", "Whale Grasshopper Optimization (WGOA)"),
    ("par", "Hybrid Parallel Algorithm"),
    ("enc", "Fireworks Encircle Algorithm"),
];

/// Marker cycle for series built from algorithm prefixes.
const MARKER_CYCLE: [SeriesMarker; 4] = [
    SeriesMarker::Circle,
    SeriesMarker::Square,
    SeriesMarker::Triangle,
    SeriesMarker::Diamond,
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Point marker drawn at every aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMarker {
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl FromStr for SeriesMarker {
    type Err = ConfigError;

    /// Accepts names and the matplotlib symbols `o s ^ d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" | "o" => Ok(SeriesMarker::Circle),
            "square" | "s" => Ok(SeriesMarker::Square),
            "triangle" | "^" => Ok(SeriesMarker::Triangle),
            "diamond" | "d" => Ok(SeriesMarker::Diamond),
            other => Err(ConfigError::Invalid(format!("unknown marker '{other}'"))),
        }
    }
}

impl<'de> Deserialize<'de> for SeriesMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SeriesMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesMarker::Circle => "circle",
            SeriesMarker::Square => "square",
            SeriesMarker::Triangle => "triangle",
            SeriesMarker::Diamond => "diamond",
        };
        f.write_str(name)
    }
}

/// One line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub column: String,
    pub label: String,
    #[serde(default = "default_marker")]
    pub marker: SeriesMarker,
}

fn default_marker() -> SeriesMarker {
    SeriesMarker::Circle
}

/// Everything the renderer needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default = "default_group_column")]
    pub group_column: String,
    pub series: Vec<SeriesSpec>,
}

fn default_group_column() -> String {
    DEFAULT_GROUP_COLUMN.to_string()
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self::for_metric(DEFAULT_METRIC, &DEFAULT_ALGORITHMS, DEFAULT_GROUP_COLUMN)
    }
}

impl ChartSpec {
    /// Compare one metric family (`fitness`, `time`, ...) across algorithms.
    pub fn for_metric<S: AsRef<str>>(metric: &str, algorithms: &[S], group_column: &str) -> Self {
        let display = metric_display_name(metric);
        let series = algorithms
            .iter()
            .enumerate()
            .map(|(i, alg)| {
                let alg = alg.as_ref();
                SeriesSpec {
                    column: format!("{alg}_{metric}"),
                    label: algorithm_display_name(alg),
                    marker: MARKER_CYCLE[i % MARKER_CYCLE.len()],
                }
            })
            .collect();

        Self {
            title: format!("{display} Comparison of Algorithms"),
            x_label: title_case(group_column),
            y_label: display,
            group_column: group_column.to_string(),
            series,
        }
    }

    /// Columns the aggregation step has to average.
    pub fn metric_columns(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.column.as_str()).collect()
    }

    /// Every column the input file must carry.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.group_column.as_str()];
        cols.extend(self.metric_columns());
        cols
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.group_column.trim().is_empty() {
            return Err(ConfigError::Invalid("group_column is empty".to_string()));
        }
        if self.series.is_empty() {
            return Err(ConfigError::Invalid("no series configured".to_string()));
        }
        if let Some(s) = self.series.iter().find(|s| s.column.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "series '{}' has no column",
                s.label
            )));
        }
        Ok(())
    }
}

pub fn metric_display_name(metric: &str) -> String {
    METRIC_FAMILIES
        .iter()
        .find(|(suffix, _)| *suffix == metric)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| title_case(metric))
}

pub fn algorithm_display_name(prefix: &str) -> String {
    ALGORITHM_NAMES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| prefix.to_ascii_uppercase())
}

/// `cloudlets` -> `Cloudlets`, `cpu_util` -> `Cpu Util`.
fn title_case(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read a JSON chart spec.
pub fn load_chart_spec(path: &Path) -> Result<ChartSpec, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let spec: ChartSpec = serde_json::from_str(&text)?;
    spec.validate()?;
    log::info!(
        "Loaded chart config {} ({} series)",
        path.display(),
        spec.series.len()
    );
    Ok(spec)
}

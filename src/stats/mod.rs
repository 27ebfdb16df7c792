//! Stats module - summary statistics of plotted series

mod calculator;

pub use calculator::{SeriesStats, StatsCalculator};

//! Data Processor Module
//! Groups result rows by a key column and averages the metric columns.

use super::loader::is_numeric;
use super::model::{GroupedTable, MetricColumn};
use polars::prelude::*;
use thiserror::Error;

/// Internal column holding the number of rows per group.
const ROW_COUNT_COL: &str = "__row_count";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Schema error: column '{column}' {problem}")]
    Schema {
        column: String,
        problem: &'static str,
    },
}

impl ProcessorError {
    fn missing(column: &str) -> Self {
        ProcessorError::Schema {
            column: column.to_string(),
            problem: "is missing",
        }
    }

    fn not_numeric(column: &str) -> Self {
        ProcessorError::Schema {
            column: column.to_string(),
            problem: "is not numeric",
        }
    }
}

/// Handles grouping and averaging of loaded results.
pub struct DataProcessor;

impl DataProcessor {
    /// Mean of every `metrics` column per distinct `key`, keys ascending.
    ///
    /// Rows with a null key are dropped. Nulls inside a metric are skipped;
    /// a group with no values for a metric gets `NaN`.
    pub fn group_mean<S: AsRef<str>>(
        df: &DataFrame,
        key: &str,
        metrics: &[S],
    ) -> Result<GroupedTable, ProcessorError> {
        Self::require_numeric(df, key)?;

        let mut names: Vec<&str> = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let metric = metric.as_ref();
            Self::require_numeric(df, metric)?;
            if metric != key && !names.contains(&metric) {
                names.push(metric);
            }
        }

        let mut aggs: Vec<Expr> = names
            .iter()
            .map(|&name| col(name).cast(DataType::Float64).mean().alias(name))
            .collect();
        aggs.push(len().alias(ROW_COUNT_COL));

        let grouped = df
            .clone()
            .lazy()
            .filter(col(key).is_not_null())
            .group_by([col(key)])
            .agg(aggs)
            .collect()?;

        let keys = Self::f64_values(grouped.column(key)?)?;
        let counts: Vec<usize> = grouped
            .column(ROW_COUNT_COL)?
            .cast(&DataType::UInt64)?
            .u64()?
            .into_iter()
            .map(|c| c.unwrap_or(0) as usize)
            .collect();

        // group_by output order is unspecified
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        let reorder = |values: &[f64]| -> Vec<f64> { order.iter().map(|&i| values[i]).collect() };

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let means = Self::f64_values(grouped.column(name)?)?;
            columns.push(MetricColumn {
                name: name.to_string(),
                means: reorder(&means),
            });
        }

        let table = GroupedTable::new(
            key.to_string(),
            reorder(&keys),
            order.iter().map(|&i| counts[i]).collect(),
            columns,
        );
        log::info!(
            "Grouped {} rows into {} '{}' groups",
            df.height(),
            table.len(),
            key
        );
        Ok(table)
    }

    /// Same as [`group_mean`](Self::group_mean) over every numeric column
    /// other than `key`. Text columns are left out.
    pub fn group_mean_numeric(df: &DataFrame, key: &str) -> Result<GroupedTable, ProcessorError> {
        let metrics: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != key && is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();
        Self::group_mean(df, key, &metrics)
    }

    /// Fail with `ProcessorError::Schema` unless `key` and every one of
    /// `metrics` is a numeric column of `df`.
    pub fn require_numeric_columns<S: AsRef<str>>(
        df: &DataFrame,
        key: &str,
        metrics: &[S],
    ) -> Result<(), ProcessorError> {
        Self::require_numeric(df, key)?;
        metrics
            .iter()
            .try_for_each(|metric| Self::require_numeric(df, metric.as_ref()))
    }

    fn require_numeric(df: &DataFrame, name: &str) -> Result<(), ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::missing(name))?;
        if !is_numeric(column.dtype()) {
            return Err(ProcessorError::not_numeric(name));
        }
        Ok(())
    }

    fn f64_values(column: &Column) -> PolarsResult<Vec<f64>> {
        Ok(column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }
}

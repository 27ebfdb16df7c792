//! Aggregated result table.

/// Per-key means of one metric column.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: String,
    pub means: Vec<f64>,
}

/// One row per distinct key, keys ascending.
///
/// Built once by [`DataProcessor`](super::DataProcessor) and read by the chart
/// and summary code. `means[i]` of every metric belongs to `keys[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    key_column: String,
    keys: Vec<f64>,
    row_counts: Vec<usize>,
    metrics: Vec<MetricColumn>,
}

/// Borrowed view of a single grouped row.
#[derive(Debug, Clone, Copy)]
pub struct GroupedRow<'a> {
    table: &'a GroupedTable,
    index: usize,
}

impl GroupedTable {
    pub(crate) fn new(
        key_column: String,
        keys: Vec<f64>,
        row_counts: Vec<usize>,
        metrics: Vec<MetricColumn>,
    ) -> Self {
        debug_assert_eq!(keys.len(), row_counts.len());
        debug_assert!(metrics.iter().all(|m| m.means.len() == keys.len()));
        Self {
            key_column,
            keys,
            row_counts,
            metrics,
        }
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    /// Number of source rows folded into each key.
    pub fn row_counts(&self) -> &[usize] {
        &self.row_counts
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name.as_str())
    }

    pub fn metric(&self, name: &str) -> Option<&[f64]> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.means.as_slice())
    }

    /// `(key, mean)` pairs of one metric, ready for plotting.
    pub fn points(&self, name: &str) -> Option<Vec<[f64; 2]>> {
        self.metric(name).map(|means| {
            self.keys
                .iter()
                .zip(means)
                .map(|(&k, &v)| [k, v])
                .collect()
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = GroupedRow<'_>> {
        (0..self.len()).map(move |index| GroupedRow { table: self, index })
    }
}

impl<'a> GroupedRow<'a> {
    pub fn key(&self) -> f64 {
        self.table.keys[self.index]
    }

    pub fn row_count(&self) -> usize {
        self.table.row_counts[self.index]
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.table.metric(metric).map(|means| means[self.index])
    }
}

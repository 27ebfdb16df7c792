//! Cloudlet Compare - simulation results aggregator & algorithm comparison chart
//!
//! Loads a CSV of CloudSim runs, averages each algorithm's metric per cloudlet
//! count and shows the comparison as a line chart.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{ChartSpec, DEFAULT_ALGORITHMS, DEFAULT_GROUP_COLUMN, DEFAULT_METRIC};
use data::{DataLoader, DataProcessor, GroupedTable};
use stats::{SeriesStats, StatsCalculator};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Compare scheduling algorithms across cloudlet counts")]
struct Cli {
    /// Results CSV; a file dialog opens when omitted
    csv: Option<PathBuf>,

    /// Metric family to compare (fitness, time, cpu_util, ram_util, bw_util, power, cpu_mean, cpu_std)
    #[arg(long, default_value = DEFAULT_METRIC)]
    metric: String,

    /// Algorithm column prefixes [default: ga,seq,fwa,woa]
    #[arg(long, value_delimiter = ',')]
    algorithms: Option<Vec<String>>,

    /// Column to group rows by
    #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
    group_by: String,

    /// JSON chart config; overrides --metric, --algorithms and --group-by
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print per-series statistics and show them under the chart
    #[arg(long)]
    summary: bool,

    /// Print the grouped table instead of opening a window
    #[arg(long)]
    no_display: bool,
}

impl Cli {
    fn chart_spec(&self) -> Result<ChartSpec> {
        if let Some(path) = &self.config {
            return config::load_chart_spec(path)
                .with_context(|| format!("loading chart config {}", path.display()));
        }

        let spec = match &self.algorithms {
            Some(algs) => ChartSpec::for_metric(&self.metric, algs, &self.group_by),
            None => ChartSpec::for_metric(&self.metric, &DEFAULT_ALGORITHMS, &self.group_by),
        };
        if spec.series.is_empty() {
            bail!("--algorithms must name at least one algorithm");
        }
        Ok(spec)
    }
}

fn pick_csv() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("CSV Files", &["csv"])
        .pick_file()
}

/// Load `path`, check the columns `spec` needs and average every numeric
/// column per group.
fn load_and_group(path: &Path, spec: &ChartSpec) -> Result<(DataLoader, GroupedTable)> {
    let mut loader = DataLoader::new();
    loader
        .load_csv(path)
        .with_context(|| format!("loading {}", path.display()))?;
    loader
        .require_columns(&spec.required_columns())
        .with_context(|| format!("checking columns of {}", path.display()))?;

    log::debug!("Numeric columns: {:?}", loader.numeric_columns());

    let df = loader.dataframe().context("no data loaded")?;
    DataProcessor::require_numeric_columns(df, &spec.group_column, &spec.metric_columns())
        .context("aggregating results")?;
    let table = DataProcessor::group_mean_numeric(df, &spec.group_column)
        .context("aggregating results")?;
    Ok((loader, table))
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v}")
    }
}

fn print_table(table: &GroupedTable) {
    let metrics: Vec<&str> = table.metric_names().collect();
    let mut header = vec![table.key_column(), "rows"];
    header.extend(&metrics);
    println!("{}", header.join("\t"));

    for row in table.rows() {
        let mut cells = vec![format_value(row.key()), row.row_count().to_string()];
        cells.extend(
            metrics
                .iter()
                .map(|c| row.get(c).map(format_value).unwrap_or_default()),
        );
        println!("{}", cells.join("\t"));
    }
}

fn summary_lines(stats: &[SeriesStats], key_label: &str) -> Vec<String> {
    let header = format!("series\tcolumn\tn\tmean\tmedian\tstd\tmin\tmax\tmin at {key_label}");
    std::iter::once(header)
        .chain(stats.iter().map(|s| {
            format!(
                "{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{}",
                s.label,
                s.column,
                s.count,
                s.mean,
                s.median,
                s.std,
                s.min,
                s.max,
                s.min_at.map(format_value).unwrap_or_else(|| "-".to_string())
            )
        }))
        .collect()
}

fn print_summary(stats: &[SeriesStats], key_label: &str) {
    for line in summary_lines(stats, key_label) {
        println!("{line}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let spec = cli.chart_spec()?;

    let path = match cli.csv.clone().or_else(pick_csv) {
        Some(path) => path,
        None => bail!("no input file given"),
    };

    let (loader, table) = load_and_group(&path, &spec)?;

    // Distinct keys in file order
    println!("[{}]", loader.unique_values(&spec.group_column).join(" "));

    let stats = cli.summary.then(|| StatsCalculator::summarize(&table, &spec));
    if let Some(stats) = &stats {
        print_summary(stats, &spec.x_label);
    }

    if cli.no_display {
        print_table(&table);
        return Ok(());
    }

    gui::present(&table, &spec, stats).map_err(|e| anyhow::anyhow!("chart window failed: {e}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LoaderError, ProcessorError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn three_row_file_groups_into_two_rows() {
        let file = write_csv(
            "cloudlets,ga_fitness,seq_fitness\n\
             10,1,2\n\
             10,3,4\n\
             20,5,6\n",
        );
        let spec = ChartSpec::for_metric("fitness", &["ga", "seq"], "cloudlets");

        let (loader, table) = load_and_group(file.path(), &spec).unwrap();
        assert_eq!(loader.unique_values("cloudlets"), vec!["10", "20"]);

        let rows: Vec<(f64, Option<f64>, Option<f64>)> = table
            .rows()
            .map(|r| (r.key(), r.get("ga_fitness"), r.get("seq_fitness")))
            .collect();
        assert_eq!(
            rows,
            vec![(10.0, Some(2.0), Some(3.0)), (20.0, Some(5.0), Some(6.0))]
        );
    }

    #[test]
    fn full_result_file_with_default_spec() {
        let file = write_csv(
            "hosts,vms,cloudlets,ga_time,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n\
             4,8,200,1.5,0.30,0.40,0.20,0.10\n\
             4,8,100,1.0,0.10,0.20,0.30,0.40\n\
             4,8,200,2.5,0.50,0.60,0.40,0.30\n",
        );

        let (_, table) = load_and_group(file.path(), &ChartSpec::default()).unwrap();
        assert_eq!(table.keys(), &[100.0, 200.0]);
        assert_eq!(table.metric("woa_fitness"), Some(&[0.4, 0.2][..]));
        assert_eq!(
            table.metric_names().collect::<Vec<_>>(),
            vec![
                "hosts",
                "vms",
                "ga_time",
                "ga_fitness",
                "seq_fitness",
                "fwa_fitness",
                "woa_fitness"
            ]
        );
        assert_eq!(table.metric("hosts"), Some(&[4.0, 4.0][..]));
        assert_eq!(table.metric("ga_time"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn text_metric_column_is_schema_error() {
        let file = write_csv(
            "cloudlets,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n\
             10,1,2,3,4\n\
             10,n/a,2,3,4\n",
        );

        let err = load_and_group(file.path(), &ChartSpec::default()).unwrap_err();
        match err.downcast_ref::<ProcessorError>() {
            Some(ProcessorError::Schema { column, problem }) => {
                assert_eq!(column, "ga_fitness");
                assert_eq!(*problem, "is not numeric");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_gives_no_groups() {
        let file = write_csv("cloudlets,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n");

        let (loader, table) = load_and_group(file.path(), &ChartSpec::default()).unwrap();
        assert!(loader.unique_values("cloudlets").is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.metric("ga_fitness"), Some(&[][..]));
    }

    #[test]
    fn short_row_contributes_to_present_columns_only() {
        let file = write_csv(
            "cloudlets,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n\
             10,1,2,3,4\n\
             10,5\n",
        );

        let (_, table) = load_and_group(file.path(), &ChartSpec::default()).unwrap();
        assert_eq!(table.row_counts(), &[2]);
        assert_eq!(table.metric("ga_fitness"), Some(&[3.0][..]));
        assert_eq!(table.metric("seq_fitness"), Some(&[2.0][..]));
    }

    #[test]
    fn summary_lines_name_each_series_column() {
        let file = write_csv(
            "cloudlets,ga_fitness,seq_fitness\n\
             10,1,2\n\
             20,3,4\n",
        );
        let spec = ChartSpec::for_metric("fitness", &["ga", "seq"], "cloudlets");
        let (_, table) = load_and_group(file.path(), &spec).unwrap();

        let lines = summary_lines(&StatsCalculator::summarize(&table, &spec), &spec.x_label);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("series\tcolumn\t"));
        assert!(lines[1].starts_with("Genetic Algorithm (GA)\tga_fitness\t2\t"));
        assert!(lines[2].starts_with("Sequential Algorithm\tseq_fitness\t2\t"));
    }

    #[test]
    fn missing_group_column_fails_before_aggregation() {
        let file = write_csv("vms,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n8,1,2,3,4\n");

        let err = load_and_group(file.path(), &ChartSpec::default()).unwrap_err();
        match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::Schema(column)) => assert_eq!(column, "cloudlets"),
            other => panic!("expected schema error, got {other:?}"),
        }
        assert!(err.downcast_ref::<ProcessorError>().is_none());
    }

    #[test]
    fn unchanged_file_gives_identical_tables() {
        let file = write_csv(
            "cloudlets,ga_fitness,seq_fitness,fwa_fitness,woa_fitness\n\
             30,0.3,0.33,0.333,0.3333\n\
             10,0.1,0.11,0.111,0.1111\n\
             30,0.6,0.66,0.666,0.6666\n\
             20,0.2,0.22,0.222,0.2222\n",
        );

        let (_, first) = load_and_group(file.path(), &ChartSpec::default()).unwrap();
        let (_, second) = load_and_group(file.path(), &ChartSpec::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn bundled_sample_groups_by_cloudlets() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sequential.csv");

        let (loader, table) = load_and_group(&path, &ChartSpec::default()).unwrap();
        assert_eq!(
            loader.unique_values("cloudlets"),
            vec!["100", "200", "300", "400"]
        );
        assert_eq!(table.keys(), &[100.0, 200.0, 300.0, 400.0]);
        assert_eq!(table.row_counts(), &[2, 2, 2, 2]);
    }

    #[test]
    fn cli_defaults_to_fitness_chart() {
        let cli = Cli::parse_from(["cloudlet_compare", "results.csv"]);
        assert_eq!(cli.csv, Some(PathBuf::from("results.csv")));
        assert_eq!(cli.chart_spec().unwrap(), ChartSpec::default());
    }

    #[test]
    fn cli_metric_and_algorithms() {
        let cli = Cli::parse_from([
            "cloudlet_compare",
            "--metric",
            "power",
            "--algorithms",
            "csa,pso",
            "--group-by",
            "vms",
        ]);
        let spec = cli.chart_spec().unwrap();
        assert_eq!(spec.title, "Power Comparison of Algorithms");
        assert_eq!(spec.group_column, "vms");
        assert_eq!(spec.metric_columns(), vec!["csa_power", "pso_power"]);
    }
}

//! CSV Data Loader Module
//! Reads simulation result files into a Polars DataFrame.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("Missing column '{0}'")]
    Schema(String),
    #[error("No data loaded")]
    NoData,
}

/// Returns true for integer and float columns.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Holds one loaded results file.
#[derive(Debug, Default)]
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a comma-separated file with a header row.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let access_err = |source| LoaderError::FileAccess {
            path: file_path.to_path_buf(),
            source,
        };

        let meta = std::fs::metadata(file_path).map_err(access_err)?;
        if !meta.is_file() {
            return Err(access_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        File::open(file_path).map_err(access_err)?;

        // Infer over the whole file so late float cells don't fail an int column
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        // A header-only file infers every column as text
        let df = if df.height() == 0 {
            Self::text_columns_as_float(df)?
        } else {
            df
        };

        log::info!(
            "Loaded {} ({} rows, {} columns)",
            file_path.display(),
            df.height(),
            df.width()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Fail with `LoaderError::Schema` on the first column not in the header.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<(), LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        for name in names {
            let name = name.as_ref();
            if df.get_column_index(name).is_none() {
                return Err(LoaderError::Schema(name.to_string()));
            }
        }
        Ok(())
    }

    /// Get list of numeric column names.
    pub fn numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Distinct values of a column in order of first appearance.
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .ok()
            .and_then(|col| col.as_materialized_series().unique_stable().ok())
            .map(|unique| {
                unique
                    .iter()
                    .filter(|val| !val.is_null())
                    .map(|val| val.to_string().trim_matches('"').to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    fn text_columns_as_float(df: DataFrame) -> PolarsResult<DataFrame> {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| match col.dtype() {
                DataType::String | DataType::Null => col.cast(&DataType::Float64),
                _ => Ok(col.clone()),
            })
            .collect::<PolarsResult<Vec<Column>>>()?;
        DataFrame::new(columns)
    }
}

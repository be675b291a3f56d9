//! CSV / Parquet writers and the provenance sidecar.
//!
//! Writes overwrite in place: no temp file, no backup of the previous output.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),

    #[error("meta serialization: {0}")]
    Meta(#[from] serde_json::Error),
}

impl OutputError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Provenance sidecar written next to an output CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMeta {
    pub file: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub data_hash: String,
    pub source: String,
    pub written_at: chrono::NaiveDateTime,
}

/// Create the parent directory of `path` if it has one.
fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// Write a frame as CSV with a header row. Dates are ISO, nulls empty.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let mut file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote CSV");
    Ok(())
}

/// Write a frame as Parquet.
pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    ParquetWriter::new(file).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote Parquet");
    Ok(())
}

/// Sidecar path for an output file: `<file>.meta.json`.
pub fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Hash the written CSV and record what it holds.
pub fn write_meta(
    csv_path: &Path,
    df: &DataFrame,
    dates: (Option<NaiveDate>, Option<NaiveDate>),
    source: &str,
) -> Result<OutputMeta, OutputError> {
    let bytes = fs::read(csv_path).map_err(|e| OutputError::io(csv_path, e))?;
    let meta = OutputMeta {
        file: csv_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        rows: df.height(),
        columns: df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect(),
        start_date: dates.0,
        end_date: dates.1,
        data_hash: blake3::hash(&bytes).to_hex().to_string(),
        source: source.to_string(),
        written_at: chrono::Local::now().naive_local(),
    };

    let path = meta_path(csv_path);
    let json = serde_json::to_string_pretty(&meta)?;
    fs::write(&path, json).map_err(|e| OutputError::io(&path, e))?;
    Ok(meta)
}

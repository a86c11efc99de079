//! CSV Data Loader Module
//! Loads the review spreadsheet with Polars and caches the prepared dataset.

use super::model::CoffeeDataset;
use super::processor::{DataProcessor, PrepareError};
use log::info;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error(transparent)]
    Prepare(#[from] PrepareError),
}

/// Identity of a source file: where it is and which version of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetKey {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl DatasetKey {
    pub fn for_path(path: &Path) -> Result<Self, LoaderError> {
        let io_err = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let path = fs::canonicalize(path).map_err(io_err)?;
        let meta = fs::metadata(&path).map_err(io_err)?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
            path,
        })
    }
}

/// Loads review CSVs and memoizes the cleaned result.
///
/// Holds a single entry: asking for a different source, or for the same
/// file after it changed on disk, replaces it.
pub struct DataLoader {
    cached: Option<(DatasetKey, Arc<CoffeeDataset>)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Return the prepared dataset for `path`, running the cleaning pass
    /// only when the source identity differs from the cached one.
    pub fn load(&mut self, path: &Path) -> Result<Arc<CoffeeDataset>, LoaderError> {
        let key = DatasetKey::for_path(path)?;

        if let Some((cached_key, dataset)) = &self.cached {
            if *cached_key == key {
                info!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        info!("Loading dataset from {}", path.display());
        let df = Self::read_csv(&key.path)?;
        let dataset = Arc::new(DataProcessor::prepare(&df)?);
        self.cached = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Read a CSV file using Polars.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// The source path of the cached dataset.
    pub fn get_file_path(&self) -> Option<&Path> {
        self.cached.as_ref().map(|(key, _)| key.path.as_path())
    }
}

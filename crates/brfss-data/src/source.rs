//! Picking a loader for a data file and building the shared [`Dataset`].

use std::{fs::File, io::BufReader, path::Path, str::FromStr, time::Instant};

use brfss_core::Dataset;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, delimited::read_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
  Parquet,
  Csv,
}

impl DataFormat {
  /// Infer the format from the file extension. Anything that is not `.csv`
  /// is treated as Parquet.
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
      _ => Self::Parquet,
    }
  }
}

impl FromStr for DataFormat {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "parquet" => Ok(Self::Parquet),
      "csv" => Ok(Self::Csv),
      _ => Err(Error::UnknownFormat(s.to_owned())),
    }
  }
}

/// Load the file at `path` into an immutable [`Dataset`].
///
/// `format` defaults to [`DataFormat::from_path`].
pub fn load_dataset(path: &Path, format: Option<DataFormat>) -> Result<Dataset> {
  let format = format.unwrap_or_else(|| DataFormat::from_path(path));
  let source = path.display().to_string();
  let started = Instant::now();
  tracing::info!(%source, ?format, "loading survey dataset");

  let file = File::open(path)?;
  let records = match format {
    DataFormat::Csv => read_csv(BufReader::new(file), &source)?,
    #[cfg(feature = "parquet")]
    DataFormat::Parquet => crate::columnar::read_parquet(file, &source)?,
    #[cfg(not(feature = "parquet"))]
    DataFormat::Parquet => return Err(Error::ParquetDisabled),
  };

  tracing::debug!(
    %source,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "dataset load finished"
  );
  Ok(Dataset::new(records))
}

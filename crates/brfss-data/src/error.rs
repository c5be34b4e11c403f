//! Error type for `brfss-data`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[cfg(feature = "parquet")]
  #[error("parquet error: {0}")]
  Parquet(#[from] parquet::errors::ParquetError),

  #[cfg(feature = "parquet")]
  #[error("arrow error: {0}")]
  Arrow(#[from] arrow_schema::ArrowError),

  /// The input lacks a column every record needs.
  #[error("dataset missing required column: {0}")]
  MissingColumn(&'static str),

  #[error("column {column} has unsupported type {data_type}")]
  UnsupportedColumnType {
    column:    &'static str,
    data_type: String,
  },

  #[error("unknown data format {0:?} (expected \"parquet\" or \"csv\")")]
  UnknownFormat(String),

  /// A Parquet file was requested but the `parquet` feature is off.
  #[error("parquet support is not compiled in")]
  ParquetDisabled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

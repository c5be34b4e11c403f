//! Loading the survey file into a [`brfss_core::Dataset`].
//!
//! The file is read exactly once at startup. Column types are coerced
//! explicitly (see [`columns`]) so CSV and Parquet inputs yield identical
//! records.

mod delimited;
mod source;

#[cfg(feature = "parquet")]
mod columnar;

pub mod columns;
pub mod error;

pub use delimited::read_csv;
pub use error::{Error, Result};
pub use source::{DataFormat, load_dataset};

#[cfg(feature = "parquet")]
pub use columnar::{read_parquet, read_parquet_bytes};

#[cfg(test)]
mod tests;

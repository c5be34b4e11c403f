//! Error types for `brfss-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown panel: {0:?}")]
  UnknownPanel(String),

  #[error("unknown age granularity: {0:?} (expected \"more\" or \"less\")")]
  UnknownAgeGranularity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

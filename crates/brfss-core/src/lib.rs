//! Core types and aggregation logic for the BRFSS survey explorer.
//!
//! This crate is deliberately free of HTTP and file-format dependencies.
//! Loading lives in `brfss-data`, serving in `brfss-api`; both depend on the
//! types defined here.

pub mod age;
pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod order;
pub mod panel;
pub mod record;

pub use aggregate::{AggregateResult, Aggregation, Estimate, Group, aggregate};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use record::Record;

//! JSON REST API for the BRFSS survey explorer.
//!
//! Exposes an axum [`Router`] over a shared, read-only [`Dataset`]. Every
//! request performs one synchronous aggregation pass over the snapshot; no
//! locks are taken because nothing ever writes to it.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", brfss_api::api_router(state.clone()))
//! ```

pub mod catalog;
pub mod error;
pub mod panels;

use std::sync::Arc;

use axum::{Router, routing::get};
use brfss_core::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Where the snapshot came from and when it was loaded.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
  pub source:    String,
  pub loaded_at: DateTime<Utc>,
  pub rows:      usize,
}

/// Shared state threaded through all handlers.
#[derive(Debug, Clone)]
pub struct ExplorerState {
  pub dataset: Dataset,
  pub info:    DatasetInfo,
}

impl ExplorerState {
  /// Wrap a freshly loaded dataset, stamping it with the current time.
  pub fn new(dataset: Dataset, source: impl Into<String>) -> Self {
    let info = DatasetInfo {
      source:    source.into(),
      loaded_at: Utc::now(),
      rows:      dataset.len(),
    };
    Self { dataset, info }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(state: Arc<ExplorerState>) -> Router<()> {
  Router::new()
    // Catalog
    .route("/dataset", get(catalog::dataset))
    .route("/classes", get(catalog::classes))
    .route("/topics", get(catalog::topics))
    .route("/questions", get(catalog::questions))
    // Panels
    .route("/panels", get(panels::all))
    .route("/panels/{panel}", get(panels::one))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

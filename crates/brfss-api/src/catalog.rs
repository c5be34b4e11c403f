//! Handlers for the Class → Topic → Question cascade.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dataset` | Snapshot metadata and the default selection |
//! | `GET`  | `/classes` | Sorted classes |
//! | `GET`  | `/topics` | `?class` required |
//! | `GET`  | `/questions` | `?class` and `?topic` required |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use brfss_core::filter::Selection;
use serde::{Deserialize, Serialize};

use crate::{DatasetInfo, ExplorerState};

// ─── Dataset ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
  #[serde(flatten)]
  pub info:              DatasetInfo,
  /// Initial dropdown values; `null` for an empty dataset.
  pub default_selection: Option<Selection>,
}

/// `GET /dataset`
pub async fn dataset(State(state): State<Arc<ExplorerState>>) -> Json<DatasetSummary> {
  Json(DatasetSummary {
    info:              state.info.clone(),
    default_selection: state.dataset.default_selection(),
  })
}

// ─── Cascade ──────────────────────────────────────────────────────────────────

/// `GET /classes`
pub async fn classes(State(state): State<Arc<ExplorerState>>) -> Json<Vec<String>> {
  Json(state.dataset.classes())
}

#[derive(Debug, Deserialize)]
pub struct TopicParams {
  pub class: String,
}

/// `GET /topics?class=<class>`
pub async fn topics(
  State(state): State<Arc<ExplorerState>>,
  Query(params): Query<TopicParams>,
) -> Json<Vec<String>> {
  Json(state.dataset.topics(&params.class))
}

#[derive(Debug, Deserialize)]
pub struct QuestionParams {
  pub class: String,
  pub topic: String,
}

/// `GET /questions?class=<class>&topic=<topic>`
pub async fn questions(
  State(state): State<Arc<ExplorerState>>,
  Query(params): Query<QuestionParams>,
) -> Json<Vec<String>> {
  Json(state.dataset.questions(&params.class, &params.topic))
}

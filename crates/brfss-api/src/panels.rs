//! Handlers for `/panels` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/panels` | `?class&topic&question` required; optional `age=more\|less` |
//! | `GET`  | `/panels/:panel` | Same params; one of `overall`, `gender`, `age`, `education`, `income`, `location`, `year` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use brfss_core::{
  filter::Selection,
  panel::{self, AgeGranularity, Panel, PanelKind},
};
use serde::{Deserialize, Serialize};

use crate::{ExplorerState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PanelParams {
  pub class:    String,
  pub topic:    String,
  pub question: String,
  /// `more` (default) or `less`.
  pub age:      Option<String>,
}

impl PanelParams {
  fn selection(&self) -> Selection {
    Selection::new(&self.class, &self.topic, &self.question)
  }

  fn age(&self) -> Result<AgeGranularity, ApiError> {
    match &self.age {
      Some(s) => Ok(s.parse()?),
      None => Ok(AgeGranularity::default()),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PanelsResponse {
  pub selection: Selection,
  pub age:       AgeGranularity,
  pub panels:    Vec<Panel>,
}

/// `GET /panels?class=...&topic=...&question=...[&age=more|less]`
///
/// A selection with no rows still returns all seven panels, each flagged
/// `no_data`.
pub async fn all(
  State(state): State<Arc<ExplorerState>>,
  Query(params): Query<PanelParams>,
) -> Result<Json<PanelsResponse>, ApiError> {
  let age = params.age()?;
  let selection = params.selection();
  let rows = state.dataset.select(&selection);
  tracing::debug!(question = %selection.question, rows = rows.len(), ?age, "building panels");

  let panels = panel::all_panels(&rows, age);
  Ok(Json(PanelsResponse { selection, age, panels }))
}

/// `GET /panels/:panel?class=...&topic=...&question=...[&age=more|less]`
pub async fn one(
  State(state): State<Arc<ExplorerState>>,
  Path(name): Path<String>,
  Query(params): Query<PanelParams>,
) -> Result<Json<Panel>, ApiError> {
  let kind: PanelKind = name.parse()?;
  let age = params.age()?;
  let rows = state.dataset.select(&params.selection());
  Ok(Json(panel::build(kind, &rows, age)))
}

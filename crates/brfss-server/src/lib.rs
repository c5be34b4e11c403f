//! HTTP front for the BRFSS survey explorer.
//!
//! Loads the survey file once into an immutable snapshot and serves the
//! [`brfss_api`] JSON routes under `/api`.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use brfss_api::ExplorerState;
use brfss_data::DataFormat;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BRFSS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  /// Path to the Parquet or CSV survey file.
  pub data_path:   PathBuf,
  /// Overrides the format inferred from `data_path`'s extension.
  #[serde(default)]
  pub data_format: Option<DataFormat>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8050 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Layer the optional TOML file at `path` under `BRFSS_*` environment
/// variables and explicit overrides, then deserialise.
pub fn load_config(
  path: PathBuf,
  data_path: Option<PathBuf>,
  port: Option<u16>,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("BRFSS"))
    .set_override_option(
      "data_path",
      data_path.map(|p| p.to_string_lossy().into_owned()),
    )?
    .set_override_option("port", port.map(i64::from))?
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level router: `/health` plus the API nested at `/api`.
pub fn router(state: Arc<ExplorerState>) -> Router {
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", brfss_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

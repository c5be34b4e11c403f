//! brfss-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), loads the
//! survey file into memory once, and serves the explorer API over HTTP.
//!
//! ```
//! cargo run -p brfss-server -- --data cleaned.parquet --port 8050
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use brfss_api::ExplorerState;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "BRFSS survey explorer server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Survey file to load; overrides `data_path` from the configuration.
  #[arg(long, value_name = "FILE")]
  data: Option<PathBuf>,

  /// Port to listen on; overrides `port` from the configuration.
  #[arg(short, long)]
  port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = brfss_server::load_config(cli.config, cli.data, cli.port)
    .context("failed to load configuration")?;

  let dataset =
    brfss_data::load_dataset(&server_cfg.data_path, server_cfg.data_format)
      .with_context(|| {
        format!("failed to load dataset from {:?}", server_cfg.data_path)
      })?;
  if dataset.is_empty() {
    tracing::warn!(path = ?server_cfg.data_path, "dataset has no rows; every panel will be empty");
  }

  let state = Arc::new(ExplorerState::new(
    dataset,
    server_cfg.data_path.display().to_string(),
  ));

  let app = brfss_server::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

//! docket server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite case store, wires the configured HTTP collaborators,
//! and serves the JSON API.

mod collaborators;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use docket_api::AppState;
use docket_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use collaborators::{HttpAnalysisOracle, HttpReportRenderer, HttpTextExtractor};

#[derive(Parser)]
#[command(author, version, about = "docket evidence ledger server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `DOCKET_*` environment variables.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  host:       String,
  port:       u16,
  store_path: PathBuf,

  /// Base URL of the analysis oracle service, if deployed.
  oracle_url:   Option<String>,
  /// Base URL of the OCR service, if deployed.
  ocr_url:      Option<String>,
  /// Base URL of the sealed-document renderer, if deployed.
  renderer_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DOCKET"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build application state, wiring whichever collaborators are configured.
  let mut state = AppState::new(Arc::new(store));

  if let Some(url) = &server_cfg.oracle_url {
    tracing::info!(url = %url, "analysis oracle configured");
    state.oracle = Some(Arc::new(HttpAnalysisOracle::new(url.clone())?));
  }
  if let Some(url) = &server_cfg.ocr_url {
    tracing::info!(url = %url, "text extractor configured");
    state.extractor = Some(Arc::new(HttpTextExtractor::new(url.clone())?));
  }
  if let Some(url) = &server_cfg.renderer_url {
    tracing::info!(url = %url, "report renderer configured");
    state.renderer = Some(Arc::new(HttpReportRenderer::new(url.clone())?));
  }

  let app = Router::new()
    .nest("/api", docket_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

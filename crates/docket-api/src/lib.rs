//! JSON REST API for docket.
//!
//! Exposes an axum [`Router`] backed by any [`docket_core::store::CaseStore`].
//! External collaborators (analysis oracle, OCR, sealed rendering) are
//! optional trait objects; endpoints that need an unwired collaborator
//! answer 503. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", docket_api::api_router(state))
//! ```

pub mod analysis;
pub mod case;
pub mod error;
pub mod evidence;
pub mod reports;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use docket_core::{
  oracle::{AnalysisOracle, ReportRenderer, TextExtractor},
  store::CaseStore,
};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub oracle:    Option<Arc<dyn AnalysisOracle>>,
  pub extractor: Option<Arc<dyn TextExtractor>>,
  pub renderer:  Option<Arc<dyn ReportRenderer>>,
}

impl<S> AppState<S> {
  /// State with no collaborators wired.
  pub fn new(store: Arc<S>) -> Self {
    Self { store, oracle: None, extractor: None, renderer: None }
  }
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      oracle:    self.oracle.clone(),
      extractor: self.extractor.clone(),
      renderer:  self.renderer.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: CaseStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Evidence
    .route("/evidence", post(evidence::create::<S>))
    .route("/evidence/{id}", get(evidence::get_one::<S>))
    .route("/evidence/{id}/text", post(evidence::attach_text::<S>))
    .route("/evidence/{id}/analyze", post(analysis::analyze_one::<S>))
    // Reports
    .route("/reports", post(reports::create::<S>))
    .route("/reports/{id}/export", post(reports::export_one::<S>))
    // Case
    .route("/case", get(case::snapshot::<S>).delete(case::clear::<S>))
    .route("/case/contradictions", post(analysis::run_contradictions::<S>))
    .with_state(state)
}

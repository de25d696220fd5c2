//! Handlers for `/case` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/case` | Indexed snapshot: reports in ledger order + referenced evidence |
//! | `DELETE` | `/case` | Bulk clear; `?purge_exports=true` is forwarded to the rendering collaborator |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use docket_core::{report::Report, store::CaseStore};

use crate::{AppState, error::ApiError, evidence::EvidenceBody};

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// The indexed case as returned by `GET /case`.
#[derive(Debug, Serialize)]
pub struct CaseBody {
  pub reports:  Vec<Report>,
  pub evidence: Vec<EvidenceBody>,
}

/// `GET /case`
pub async fn snapshot<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<CaseBody>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let snapshot = state
    .store
    .get_all_indexed()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(CaseBody {
    reports:  snapshot.reports,
    evidence: snapshot
      .evidence
      .into_iter()
      .map(EvidenceBody::from)
      .collect(),
  }))
}

// ─── Clear ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClearParams {
  /// Also delete derived export artifacts held by the rendering
  /// collaborator. No effect on the store's own collections.
  #[serde(default)]
  pub purge_exports: bool,
}

/// `DELETE /case[?purge_exports=true]`
pub async fn clear<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ClearParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .clear_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if params.purge_exports
    && let Some(renderer) = &state.renderer
  {
    renderer.purge_exports().await?;
  }

  Ok(StatusCode::NO_CONTENT)
}

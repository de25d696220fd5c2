//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/reports` | Body: [`NewReportBody`]; returns 201 + the appended report with its chapter index |
//! | `POST` | `/reports/:id/export` | Sealed export via the rendering collaborator |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docket_core::{
  evidence::EvidenceRef,
  report::{Contradiction, Finding, NewReport, TimelineEvent},
  store::CaseStore,
};

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /reports`.
#[derive(Debug, Deserialize)]
pub struct NewReportBody {
  pub title:          String,
  pub jurisdiction:   String,
  pub timezone:       String,
  #[serde(default)]
  pub evidence_refs:  Vec<EvidenceRef>,
  #[serde(default)]
  pub findings:       Vec<Finding>,
  #[serde(default)]
  pub contradictions: Vec<Contradiction>,
  #[serde(default)]
  pub timeline:       Vec<TimelineEvent>,
}

impl From<NewReportBody> for NewReport {
  fn from(b: NewReportBody) -> Self {
    NewReport {
      title:          b.title,
      jurisdiction:   b.jurisdiction,
      timezone:       b.timezone,
      evidence_refs:  b.evidence_refs,
      findings:       b.findings,
      contradictions: b.contradictions,
      timeline:       b.timeline,
    }
  }
}

/// `POST /reports` — append to the case ledger; returns 201 + the stored
/// [`docket_core::report::Report`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewReportBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = state
    .store
    .append_report(NewReport::from(body))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(report)))
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Response body for `POST /reports/:id/export`.
#[derive(Debug, Serialize)]
pub struct ExportBody {
  pub document_base64: String,
  pub digest:          String,
  pub code_payload:    String,
}

/// `POST /reports/:id/export` — render a sealed export document.
///
/// Resolves the report through the indexed read path, so only committed,
/// index-listed reports are exportable. The rendering collaborator answers
/// with the sealed bytes; nothing is written to the store.
pub async fn export_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ExportBody>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let renderer = state
    .renderer
    .as_ref()
    .ok_or(ApiError::Unconfigured("report renderer"))?;

  let snapshot = state
    .store
    .get_all_indexed()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let report = snapshot
    .reports
    .iter()
    .find(|r| r.report_id == id)
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;

  let referenced: Vec<_> = snapshot
    .evidence
    .iter()
    .filter(|e| {
      report
        .evidence_refs
        .iter()
        .any(|r| r.evidence_id == e.evidence_id)
    })
    .cloned()
    .collect();

  let sealed = renderer.render_sealed(report, &referenced).await?;

  Ok(Json(ExportBody {
    document_base64: BASE64.encode(&sealed.bytes),
    digest:          sealed.digest,
    code_payload:    sealed.code_payload,
  }))
}

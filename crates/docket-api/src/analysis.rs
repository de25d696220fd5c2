//! Handlers for analysis endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/evidence/:id/analyze` | Corroborated oracle findings for one artifact; persists nothing |
//! | `POST` | `/case/contradictions` | Run the contradiction engine over the indexed case and append the result as a new report |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use docket_core::{
  evidence::EvidenceRef,
  oracle::OracleRequest,
  report::{Finding, NewReport},
  store::CaseStore,
};
use docket_engine::{CorroborateError, corroborate_findings, find_contradictions};

use crate::{AppState, error::ApiError};

// ─── Oracle analysis ─────────────────────────────────────────────────────────

/// `POST /evidence/:id/analyze`
///
/// Runs the analysis oracle the full consensus-pass count and returns the
/// tier-classified findings. When the oracle fails on every invocation the
/// response is a neutral 502 and nothing is persisted; attaching findings
/// to a report is a separate, explicit `POST /reports`.
pub async fn analyze_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Finding>>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let oracle = state
    .oracle
    .as_ref()
    .ok_or(ApiError::Unconfigured("analysis oracle"))?;

  let evidence = state
    .store
    .get_evidence(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("evidence {id} not found")))?;

  let findings =
    corroborate_findings(oracle.as_ref(), OracleRequest::for_evidence(&evidence))
      .await
      .map_err(|e| match e {
        CorroborateError::OracleUnavailable(cause) => {
          tracing::warn!(evidence_id = %id, error = %cause, "oracle analysis failed");
          ApiError::OracleUnavailable
        }
      })?;

  Ok(Json(findings))
}

// ─── Contradiction run ───────────────────────────────────────────────────────

/// Optional overrides for the appended contradiction report.
#[derive(Debug, Default, Deserialize)]
pub struct ContradictionRunParams {
  pub title:        Option<String>,
  pub jurisdiction: Option<String>,
  pub timezone:     Option<String>,
}

/// `POST /case/contradictions[?title=...&jurisdiction=...&timezone=...]`
///
/// Loads the indexed case, runs the three-pass contradiction engine over
/// it, and appends a new report carrying the consensus-classified
/// contradictions. Returns 201 + the appended report.
pub async fn run_contradictions<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ContradictionRunParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let snapshot = state
    .store
    .get_all_indexed()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let contradictions = find_contradictions(&snapshot);
  tracing::info!(
    reports = snapshot.reports.len(),
    evidence = snapshot.evidence.len(),
    contradictions = contradictions.len(),
    "contradiction run complete"
  );

  let latest = snapshot.reports.last();
  let input = NewReport {
    title:          params
      .title
      .unwrap_or_else(|| "Cross-evidence contradiction review".into()),
    jurisdiction:   params
      .jurisdiction
      .or_else(|| latest.map(|r| r.jurisdiction.clone()))
      .unwrap_or_default(),
    timezone:       params
      .timezone
      .or_else(|| latest.map(|r| r.timezone.clone()))
      .unwrap_or_else(|| "UTC".into()),
    evidence_refs:  snapshot.evidence.iter().map(EvidenceRef::of).collect(),
    findings:       Vec::new(),
    contradictions,
    timeline:       Vec::new(),
  };

  let report = state
    .store
    .append_report(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(report)))
}

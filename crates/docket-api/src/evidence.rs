//! Handlers for `/evidence` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/evidence` | Body: [`NewEvidenceBody`]; returns 201 + [`EvidenceBody`] |
//! | `GET`  | `/evidence/:id` | Single record, content omitted |
//! | `POST` | `/evidence/:id/text` | Attach extracted text (at most once); falls back to the OCR collaborator when machine text is insufficient |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docket_core::{
  evidence::{Evidence, NewEvidence},
  oracle::needs_extraction,
  store::CaseStore,
};

use crate::{AppState, error::ApiError};

// ─── Response body ────────────────────────────────────────────────────────────

/// An evidence record as returned by the API. Raw content never leaves the
/// store through this surface; the digest identifies it.
#[derive(Debug, Serialize)]
pub struct EvidenceBody {
  pub evidence_id:    Uuid,
  pub name:           String,
  pub size:           u64,
  pub media_type:     String,
  pub digest:         String,
  pub created_at:     DateTime<Utc>,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub metadata:       BTreeMap<String, String>,
  pub extracted_text: Option<String>,
}

impl From<Evidence> for EvidenceBody {
  fn from(e: Evidence) -> Self {
    Self {
      evidence_id:    e.evidence_id,
      name:           e.name,
      size:           e.size,
      media_type:     e.media_type,
      digest:         e.digest,
      created_at:     e.created_at,
      jurisdiction:   e.jurisdiction,
      timezone:       e.timezone,
      metadata:       e.metadata,
      extracted_text: e.extracted_text,
    }
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /evidence`.
#[derive(Debug, Deserialize)]
pub struct NewEvidenceBody {
  pub name:           String,
  pub content_base64: String,
  pub media_type:     String,
  pub jurisdiction:   String,
  pub timezone:       String,
  #[serde(default)]
  pub metadata:       BTreeMap<String, String>,
}

/// `POST /evidence` — ingest an artifact; returns 201 + the stored record.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewEvidenceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let content = BASE64
    .decode(&body.content_base64)
    .map_err(|e| ApiError::BadRequest(format!("invalid base64 content: {e}")))?;

  let input = NewEvidence {
    name:         body.name,
    content,
    media_type:   body.media_type,
    jurisdiction: body.jurisdiction,
    timezone:     body.timezone,
    metadata:     body.metadata,
  };

  let evidence = state
    .store
    .put_evidence(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(EvidenceBody::from(evidence))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /evidence/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EvidenceBody>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let evidence = state
    .store
    .get_evidence(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("evidence {id} not found")))?;
  Ok(Json(EvidenceBody::from(evidence)))
}

// ─── Attach text ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AttachTextBody {
  /// Machine-readable text, when the client already has it.
  pub text: Option<String>,
}

/// `POST /evidence/:id/text` — attach extracted text to an evidence record.
///
/// When the supplied machine text is missing or too thin to analyse, the
/// OCR collaborator is consulted instead. Text can be attached at most
/// once; a second attempt answers 409.
pub async fn attach_text<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AttachTextBody>,
) -> Result<Json<EvidenceBody>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut evidence = state
    .store
    .get_evidence(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("evidence {id} not found")))?;

  let text = match (body.text, &state.extractor) {
    // Substantial machine text wins; no OCR round trip.
    (Some(t), _) if !needs_extraction(Some(&t)) => t,
    (_, Some(extractor)) => {
      tracing::info!(evidence_id = %id, "machine text insufficient, invoking OCR");
      extractor
        .extract_text(&evidence.content, &evidence.media_type)
        .await?
    }
    // Thin machine text and no OCR wired: keep what the client had.
    (Some(t), None) => t,
    (None, None) => return Err(ApiError::Unconfigured("text extractor")),
  };

  evidence
    .attach_text(text)
    .map_err(|e| ApiError::Conflict(e.to_string()))?;
  state
    .store
    .update_evidence(evidence.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(EvidenceBody::from(evidence)))
}

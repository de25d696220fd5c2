//! External collaborator interfaces.
//!
//! The analysis oracle, OCR text extraction and sealed document rendering
//! are all consumed behind narrow trait objects — the store and engine never
//! depend on how they are implemented. `docket-server` ships HTTP-backed
//! clients; tests use in-process fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
  evidence::Evidence,
  report::{Highlight, Report},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure reported by an external collaborator.
///
/// Shared across all collaborator traits so they stay usable as trait
/// objects without per-implementation error plumbing.
#[derive(Debug, Error)]
pub enum CollaboratorError {
  #[error("collaborator unavailable: {0}")]
  Unavailable(String),

  /// The collaborator answered but the response could not be interpreted.
  #[error("malformed collaborator response: {0}")]
  Malformed(String),

  #[error("collaborator transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ─── Analysis oracle ─────────────────────────────────────────────────────────

/// One request to the analysis oracle.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
  pub content:        &'a [u8],
  pub media_type:     &'a str,
  pub extracted_text: Option<&'a str>,
  pub jurisdiction:   &'a str,
}

impl<'a> OracleRequest<'a> {
  pub fn for_evidence(evidence: &'a Evidence) -> Self {
    Self {
      content:        &evidence.content,
      media_type:     &evidence.media_type,
      extracted_text: evidence.extracted_text.as_deref(),
      jurisdiction:   &evidence.jurisdiction,
    }
  }
}

/// A finding as returned by the oracle, before tier classification.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OracleFinding {
  pub title:      String,
  pub trigger:    String,
  pub source:     String,
  pub rationale:  String,
  #[serde(default)]
  pub highlights: Vec<Highlight>,
}

/// The external text/analysis oracle: evidence bytes in, structured
/// findings out.
///
/// May be invoked several times for the same evidence; corroboration across
/// invocations derives a verification tier.
#[async_trait]
pub trait AnalysisOracle: Send + Sync {
  async fn analyze(
    &self,
    request: OracleRequest<'_>,
  ) -> Result<Vec<OracleFinding>, CollaboratorError>;
}

// ─── Text extraction ─────────────────────────────────────────────────────────

/// Extracted text shorter than this is treated as "likely scanned image"
/// and routed through the OCR collaborator.
pub const MIN_MACHINE_TEXT_LEN: usize = 100;

/// Whether the machine-readable text for an artifact is too thin to analyse
/// and OCR should be invoked.
pub fn needs_extraction(extracted_text: Option<&str>) -> bool {
  extracted_text.is_none_or(|t| t.trim().len() < MIN_MACHINE_TEXT_LEN)
}

/// The OCR collaborator: evidence bytes in, plain text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
  async fn extract_text(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> Result<String, CollaboratorError>;
}

// ─── Sealed rendering ────────────────────────────────────────────────────────

/// A rendered export document, sealed with the content digest and a
/// scannable code payload (report id, digest, timestamp, jurisdiction).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SealedDocument {
  pub bytes:        Vec<u8>,
  pub digest:       String,
  pub code_payload: String,
}

/// The document-rendering collaborator. Rendering is a pure export with no
/// effect on the store; `purge_exports` backs the bulk-clear flag for
/// derived artifacts.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
  async fn render_sealed(
    &self,
    report: &Report,
    evidence: &[Evidence],
  ) -> Result<SealedDocument, CollaboratorError>;

  async fn purge_exports(&self) -> Result<(), CollaboratorError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_or_missing_text_needs_extraction() {
    assert!(needs_extraction(None));
    assert!(needs_extraction(Some("")));
    assert!(needs_extraction(Some("scan artifact")));
    assert!(needs_extraction(Some(&" ".repeat(200))));
  }

  #[test]
  fn substantial_text_does_not() {
    let text = "x".repeat(MIN_MACHINE_TEXT_LEN);
    assert!(!needs_extraction(Some(&text)));
  }
}

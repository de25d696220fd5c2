//! HTTP-backed implementations of the external collaborator traits.
//!
//! Each collaborator is a small JSON service reached over HTTP: the
//! analysis oracle, the OCR text extractor, and the sealed-document
//! renderer. Binary payloads cross the wire as base64.

use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use docket_core::{
  evidence::Evidence,
  oracle::{
    AnalysisOracle, CollaboratorError, OracleFinding, OracleRequest,
    ReportRenderer, SealedDocument, TextExtractor,
  },
  report::Report,
};

fn transport(e: reqwest::Error) -> CollaboratorError {
  CollaboratorError::Transport(Box::new(e))
}

fn build_client() -> anyhow::Result<Client> {
  Client::builder()
    .timeout(Duration::from_secs(60))
    .build()
    .context("failed to build HTTP client")
}

fn check_status(
  resp: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
  if resp.status().is_success() {
    Ok(resp)
  } else {
    Err(CollaboratorError::Unavailable(format!(
      "{} → {}",
      resp.url(),
      resp.status()
    )))
  }
}

// ─── Analysis oracle ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AnalyzeRequestBody<'a> {
  content_base64: String,
  media_type:     &'a str,
  extracted_text: Option<&'a str>,
  jurisdiction:   &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponseBody {
  findings: Vec<OracleFinding>,
}

/// Analysis oracle client: `POST {base}/analyze`.
#[derive(Clone)]
pub struct HttpAnalysisOracle {
  client:   Client,
  base_url: String,
}

impl HttpAnalysisOracle {
  pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
    Ok(Self { client: build_client()?, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url.trim_end_matches('/'))
  }
}

#[async_trait]
impl AnalysisOracle for HttpAnalysisOracle {
  async fn analyze(
    &self,
    request: OracleRequest<'_>,
  ) -> Result<Vec<OracleFinding>, CollaboratorError> {
    let body = AnalyzeRequestBody {
      content_base64: BASE64.encode(request.content),
      media_type:     request.media_type,
      extracted_text: request.extracted_text,
      jurisdiction:   request.jurisdiction,
    };

    let resp = self
      .client
      .post(self.url("/analyze"))
      .json(&body)
      .send()
      .await
      .map_err(transport)?;

    let parsed: AnalyzeResponseBody = check_status(resp)?
      .json()
      .await
      .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    Ok(parsed.findings)
  }
}

// ─── Text extraction ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ExtractRequestBody<'a> {
  content_base64: String,
  media_type:     &'a str,
}

#[derive(Deserialize)]
struct ExtractResponseBody {
  text: String,
}

/// OCR client: `POST {base}/extract`.
#[derive(Clone)]
pub struct HttpTextExtractor {
  client:   Client,
  base_url: String,
}

impl HttpTextExtractor {
  pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
    Ok(Self { client: build_client()?, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url.trim_end_matches('/'))
  }
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
  async fn extract_text(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> Result<String, CollaboratorError> {
    let body = ExtractRequestBody {
      content_base64: BASE64.encode(content),
      media_type,
    };

    let resp = self
      .client
      .post(self.url("/extract"))
      .json(&body)
      .send()
      .await
      .map_err(transport)?;

    let parsed: ExtractResponseBody = check_status(resp)?
      .json()
      .await
      .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    Ok(parsed.text)
  }
}

// ─── Sealed rendering ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RenderEvidenceBody<'a> {
  name:           &'a str,
  media_type:     &'a str,
  digest:         &'a str,
  content_base64: String,
}

#[derive(Serialize)]
struct RenderRequestBody<'a> {
  report:   &'a Report,
  evidence: Vec<RenderEvidenceBody<'a>>,
}

#[derive(Deserialize)]
struct RenderResponseBody {
  document_base64: String,
  digest:          String,
  code_payload:    String,
}

/// Sealed-document renderer client: `POST {base}/render`,
/// `DELETE {base}/exports`.
#[derive(Clone)]
pub struct HttpReportRenderer {
  client:   Client,
  base_url: String,
}

impl HttpReportRenderer {
  pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
    Ok(Self { client: build_client()?, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url.trim_end_matches('/'))
  }
}

#[async_trait]
impl ReportRenderer for HttpReportRenderer {
  async fn render_sealed(
    &self,
    report: &Report,
    evidence: &[Evidence],
  ) -> Result<SealedDocument, CollaboratorError> {
    let body = RenderRequestBody {
      report,
      evidence: evidence
        .iter()
        .map(|e| RenderEvidenceBody {
          name:           &e.name,
          media_type:     &e.media_type,
          digest:         &e.digest,
          content_base64: BASE64.encode(&e.content),
        })
        .collect(),
    };

    let resp = self
      .client
      .post(self.url("/render"))
      .json(&body)
      .send()
      .await
      .map_err(transport)?;

    let parsed: RenderResponseBody = check_status(resp)?
      .json()
      .await
      .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    let bytes = BASE64
      .decode(&parsed.document_base64)
      .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    Ok(SealedDocument {
      bytes,
      digest: parsed.digest,
      code_payload: parsed.code_payload,
    })
  }

  async fn purge_exports(&self) -> Result<(), CollaboratorError> {
    let resp = self
      .client
      .delete(self.url("/exports"))
      .send()
      .await
      .map_err(transport)?;
    check_status(resp)?;
    Ok(())
  }
}

//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields
//! (metadata, evidence refs, findings, contradictions, timeline) are stored
//! as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use docket_core::{
  evidence::{Evidence, EvidenceRef},
  report::{Contradiction, Finding, Report, TimelineEvent},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON payload columns ────────────────────────────────────────────────────

pub fn encode_metadata(m: &BTreeMap<String, String>) -> Result<String> {
  Ok(serde_json::to_string(m)?)
}

pub fn decode_metadata(s: &str) -> Result<BTreeMap<String, String>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_refs(refs: &[EvidenceRef]) -> Result<String> {
  Ok(serde_json::to_string(refs)?)
}

pub fn decode_refs(s: &str) -> Result<Vec<EvidenceRef>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_findings(f: &[Finding]) -> Result<String> {
  Ok(serde_json::to_string(f)?)
}

pub fn encode_contradictions(c: &[Contradiction]) -> Result<String> {
  Ok(serde_json::to_string(c)?)
}

pub fn encode_timeline(t: &[TimelineEvent]) -> Result<String> {
  Ok(serde_json::to_string(t)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read directly from an `evidence` row.
pub struct RawEvidence {
  pub evidence_id:    String,
  pub name:           String,
  pub size:           i64,
  pub media_type:     String,
  pub content:        Vec<u8>,
  pub digest:         String,
  pub created_at:     String,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub metadata:       String,
  pub extracted_text: Option<String>,
}

impl RawEvidence {
  pub fn into_evidence(self) -> Result<Evidence> {
    Ok(Evidence {
      evidence_id:    decode_uuid(&self.evidence_id)?,
      name:           self.name,
      size:           self.size as u64,
      media_type:     self.media_type,
      content:        self.content,
      digest:         self.digest,
      created_at:     decode_dt(&self.created_at)?,
      jurisdiction:   self.jurisdiction,
      timezone:       self.timezone,
      metadata:       decode_metadata(&self.metadata)?,
      extracted_text: self.extracted_text,
    })
  }
}

/// Raw column values read directly from a `reports` row.
pub struct RawReport {
  pub report_id:      String,
  pub title:          String,
  pub chapter_index:  i64,
  pub created_at:     String,
  pub updated_at:     String,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub evidence_refs:  String,
  pub findings:       String,
  pub contradictions: String,
  pub timeline:       String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      report_id:      decode_uuid(&self.report_id)?,
      title:          self.title,
      chapter_index:  self.chapter_index as u32,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
      jurisdiction:   self.jurisdiction,
      timezone:       self.timezone,
      evidence_refs:  decode_refs(&self.evidence_refs)?,
      findings:       serde_json::from_str(&self.findings)?,
      contradictions: serde_json::from_str(&self.contradictions)?,
      timeline:       serde_json::from_str(&self.timeline)?,
    })
  }
}

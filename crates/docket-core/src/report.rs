//! Report types — structured analysis results placed in the case ledger.
//!
//! A report references evidence by id + digest (never by copying content)
//! and carries three kinds of derived content: findings from the analysis
//! oracle, contradictions from the detection engine, and timeline events.
//! All three are immutable once attached.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{evidence::EvidenceRef, verify::VerificationTier};

// ─── Finding ─────────────────────────────────────────────────────────────────

/// A rectangular region on a rendered page, as reported by the analysis
/// oracle. Coordinates are fractions of the page dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
  pub page:   u32,
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
}

/// A single analysis observation attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
  pub title:        String,
  /// What in the evidence triggered the observation.
  pub trigger:      String,
  /// Where in the evidence the observation was made.
  pub source:       String,
  pub rationale:    String,
  /// Consensus outcome of the corroboration pass that produced the finding,
  /// when one ran.
  pub verification: Option<VerificationTier>,
  #[serde(default)]
  pub highlights:   Vec<Highlight>,
}

// ─── Contradiction ───────────────────────────────────────────────────────────

/// The category of a detected inconsistency.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
  /// Two evidence items make directly conflicting claims.
  Direct,
  /// An item's content disagrees with its own metadata.
  MetadataMismatch,
  /// Two apparent versions of the same document differ in content.
  CrossDocumentDrift,
  /// An item references material absent from the case file.
  Omission,
}

impl ContradictionKind {
  /// The discriminant string used in de-duplication keys and storage.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Direct => "direct",
      Self::MetadataMismatch => "metadata_mismatch",
      Self::CrossDocumentDrift => "cross_document_drift",
      Self::Omission => "omission",
    }
  }
}

/// A detected inconsistency between evidence items, or between an item's
/// content and its metadata.
///
/// The triple (kind, sorted `sources`, `explanation`) is the stable
/// de-duplication key the engine uses across consensus passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contradiction {
  pub kind:         ContradictionKind,
  pub actor:        Option<String>,
  pub claim_a:      Option<String>,
  pub claim_b:      Option<String>,
  /// Ids of the evidence items involved.
  pub sources:      Vec<Uuid>,
  pub explanation:  String,
  pub verification: VerificationTier,
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// A dated event reconstructed from the evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
  pub date:        Option<NaiveDate>,
  pub description: String,
  #[serde(default)]
  pub sources:     Vec<Uuid>,
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A structured analysis result placed at a fixed chapter position in the
/// case ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:      Uuid,
  pub title:          String,
  /// Ledger position; strictly increasing from 1, assigned on append and
  /// never reused.
  pub chapter_index:  u32,
  pub created_at:     DateTime<Utc>,
  /// Refreshed on structural edits.
  pub updated_at:     DateTime<Utc>,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub evidence_refs:  Vec<EvidenceRef>,
  pub findings:       Vec<Finding>,
  pub contradictions: Vec<Contradiction>,
  pub timeline:       Vec<TimelineEvent>,
}

/// Input to [`crate::store::CaseStore::append_report`].
/// Id, chapter index and timestamps are always assigned by the ledger.
#[derive(Debug, Clone)]
pub struct NewReport {
  pub title:          String,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub evidence_refs:  Vec<EvidenceRef>,
  pub findings:       Vec<Finding>,
  pub contradictions: Vec<Contradiction>,
  pub timeline:       Vec<TimelineEvent>,
}

impl NewReport {
  /// Convenience constructor for a report with no derived content yet.
  pub fn new(
    title: impl Into<String>,
    jurisdiction: impl Into<String>,
    timezone: impl Into<String>,
  ) -> Self {
    Self {
      title:          title.into(),
      jurisdiction:   jurisdiction.into(),
      timezone:       timezone.into(),
      evidence_refs:  Vec::new(),
      findings:       Vec::new(),
      contradictions: Vec::new(),
      timeline:       Vec::new(),
    }
  }
}

//! Evidence — the immutable, content-addressed record of an uploaded
//! artifact.
//!
//! Evidence is never edited after ingest, with one exception: the
//! `extracted_text` field may be attached once when OCR or machine text
//! extraction completes. Content bytes are owned exclusively by the record;
//! reports reference evidence by id plus the digest observed at reference
//! time and never copy content.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable artifact in the case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
  pub evidence_id:    Uuid,
  /// Original file name as supplied on ingest.
  pub name:           String,
  /// Byte length of `content`.
  pub size:           u64,
  /// Declared MIME type; not verified against content.
  pub media_type:     String,
  pub content:        Vec<u8>,
  /// Lowercase-hex SHA-512 of `content`; assigned at ingest, never changes.
  pub digest:         String,
  pub created_at:     DateTime<Utc>,
  pub jurisdiction:   String,
  pub timezone:       String,
  pub metadata:       BTreeMap<String, String>,
  /// Machine-readable or OCR text; attached at most once after ingest.
  pub extracted_text: Option<String>,
}

impl Evidence {
  /// Attach extracted text. Allowed exactly once; content and digest are
  /// untouched.
  pub fn attach_text(&mut self, text: String) -> crate::Result<()> {
    if self.extracted_text.is_some() {
      return Err(crate::Error::TextAlreadyAttached(self.evidence_id));
    }
    self.extracted_text = Some(text);
    Ok(())
  }
}

/// A soft reference from a report to an evidence record.
///
/// Resolved at read time; the referenced evidence may have been cleared
/// since the reference was recorded, and absence is tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
  pub evidence_id: Uuid,
  /// The digest recorded at the time the reference was made.
  pub digest:      String,
}

impl EvidenceRef {
  pub fn of(evidence: &Evidence) -> Self {
    Self {
      evidence_id: evidence.evidence_id,
      digest:      evidence.digest.clone(),
    }
  }
}

/// Input to [`crate::store::CaseStore::put_evidence`].
/// Id, digest, size and timestamp are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewEvidence {
  pub name:         String,
  pub content:      Vec<u8>,
  pub media_type:   String,
  pub jurisdiction: String,
  pub timezone:     String,
  pub metadata:     BTreeMap<String, String>,
}

impl NewEvidence {
  /// Convenience constructor with empty metadata.
  pub fn new(
    name: impl Into<String>,
    content: Vec<u8>,
    media_type: impl Into<String>,
    jurisdiction: impl Into<String>,
    timezone: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      content,
      media_type: media_type.into(),
      jurisdiction: jurisdiction.into(),
      timezone: timezone.into(),
      metadata: BTreeMap::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::fingerprint::fingerprint;

  fn sample() -> Evidence {
    let content = b"affidavit".to_vec();
    Evidence {
      evidence_id:    Uuid::new_v4(),
      name:           "affidavit.pdf".into(),
      size:           content.len() as u64,
      media_type:     "application/pdf".into(),
      digest:         fingerprint(&content),
      content,
      created_at:     Utc::now(),
      jurisdiction:   "us-ca".into(),
      timezone:       "America/Los_Angeles".into(),
      metadata:       BTreeMap::new(),
      extracted_text: None,
    }
  }

  #[test]
  fn text_attaches_exactly_once() {
    let mut evidence = sample();
    evidence.attach_text("sworn on 2024-01-05".into()).unwrap();
    assert_eq!(evidence.extracted_text.as_deref(), Some("sworn on 2024-01-05"));

    let err = evidence.attach_text("second attempt".into()).unwrap_err();
    assert!(matches!(err, crate::Error::TextAlreadyAttached(_)));
  }
}

//! The heuristic detectors.
//!
//! Each detector is a pure function over the evidence in scope and emits
//! [`Detection`]s — contradictions before consensus classification. For the
//! same underlying facts a detector must format its explanation identically
//! on every pass: any pass-dependent value in the text would break the
//! de-duplication key.

use docket_core::{evidence::Evidence, report::ContradictionKind};
use uuid::Uuid;

use crate::scan::{mentioned_dates, referenced_tokens};

/// A raw detection, prior to consensus reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
  pub kind:        ContradictionKind,
  pub sources:     Vec<Uuid>,
  pub explanation: String,
}

impl Detection {
  /// The order-independent de-duplication key: kind, sorted source set,
  /// explanation text. Sorting the sources neutralises pass-to-pass
  /// shuffling of the input.
  pub fn key(&self) -> (ContradictionKind, Vec<Uuid>, String) {
    let mut sources = self.sources.clone();
    sources.sort();
    sources.dedup();
    (self.kind, sources, self.explanation.clone())
  }
}

/// Run every detector over the evidence in scope.
pub fn detect_all(evidence: &[&Evidence]) -> Vec<Detection> {
  let mut out = detect_cross_document_drift(evidence);
  out.extend(detect_metadata_mismatch(evidence));
  out.extend(detect_omissions(evidence));
  out
}

/// File name with the extension stripped, case-folded.
fn stem(name: &str) -> String {
  match name.rsplit_once('.') {
    Some((base, _ext)) if !base.is_empty() => base.to_lowercase(),
    _ => name.to_lowercase(),
  }
}

/// Two files whose normalized names are substrings of one another (but not
/// equal) look like versions of the same document; differing digests mean
/// the content drifted between them.
pub fn detect_cross_document_drift(evidence: &[&Evidence]) -> Vec<Detection> {
  let mut out = Vec::new();

  for (i, a) in evidence.iter().enumerate() {
    for b in &evidence[i + 1..] {
      let stem_a = stem(&a.name);
      let stem_b = stem(&b.name);
      if stem_a.is_empty() || stem_b.is_empty() {
        continue;
      }

      let related = stem_a != stem_b
        && (stem_a.contains(&stem_b) || stem_b.contains(&stem_a));
      if !related || a.digest == b.digest {
        continue;
      }

      // Name the pair in a fixed order so the explanation is identical no
      // matter which shuffle produced it.
      let (first, second) = if (&a.name, a.evidence_id) <= (&b.name, b.evidence_id)
      {
        (a, b)
      } else {
        (b, a)
      };

      out.push(Detection {
        kind:        ContradictionKind::CrossDocumentDrift,
        sources:     vec![first.evidence_id, second.evidence_id],
        explanation: format!(
          "\"{}\" and \"{}\" appear to be versions of the same document but their contents differ.",
          first.name, second.name
        ),
      });
    }
  }

  out
}

/// A document whose text mentions a date later than its own ingest
/// timestamp disagrees with its metadata.
pub fn detect_metadata_mismatch(evidence: &[&Evidence]) -> Vec<Detection> {
  let mut out = Vec::new();

  for e in evidence {
    let Some(text) = e.extracted_text.as_deref() else {
      continue;
    };
    let created = e.created_at.date_naive();

    for date in mentioned_dates(text) {
      if date > created {
        out.push(Detection {
          kind:        ContradictionKind::MetadataMismatch,
          sources:     vec![e.evidence_id],
          explanation: format!(
            "\"{}\" mentions {} but was added to the case on {}.",
            e.name,
            date.format("%Y-%m-%d"),
            created.format("%Y-%m-%d")
          ),
        });
      }
    }
  }

  out
}

/// A document that cites an exhibit or attachment with no matching evidence
/// name anywhere in scope.
pub fn detect_omissions(evidence: &[&Evidence]) -> Vec<Detection> {
  let mut out = Vec::new();

  for e in evidence {
    let Some(text) = e.extracted_text.as_deref() else {
      continue;
    };

    for token in referenced_tokens(text) {
      let resolved = evidence
        .iter()
        .any(|other| other.name.to_lowercase().contains(&token));
      if !resolved {
        out.push(Detection {
          kind:        ContradictionKind::Omission,
          sources:     vec![e.evidence_id],
          explanation: format!(
            "\"{}\" references \"{}\" but no matching evidence is in the case file.",
            e.name, token
          ),
        });
      }
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use docket_core::fingerprint::fingerprint;

  use super::*;

  fn evidence(name: &str, content: &[u8], text: Option<&str>) -> Evidence {
    Evidence {
      evidence_id:    Uuid::new_v4(),
      name:           name.into(),
      size:           content.len() as u64,
      media_type:     "application/pdf".into(),
      content:        content.to_vec(),
      digest:         fingerprint(content),
      created_at:     Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
      jurisdiction:   "us-ca".into(),
      timezone:       "America/Los_Angeles".into(),
      metadata:       Default::default(),
      extracted_text: text.map(String::from),
    }
  }

  // ── Cross-document drift ──────────────────────────────────────────────

  #[test]
  fn versioned_names_with_differing_content_drift() {
    let a = evidence("statement.pdf", b"first draft", None);
    let b = evidence("statement_v2.pdf", b"second draft", None);

    let detections = detect_cross_document_drift(&[&a, &b]);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].kind, ContradictionKind::CrossDocumentDrift);
    assert!(detections[0].sources.contains(&a.evidence_id));
    assert!(detections[0].sources.contains(&b.evidence_id));
  }

  #[test]
  fn identical_content_does_not_drift() {
    let a = evidence("statement.pdf", b"same", None);
    let b = evidence("statement_v2.pdf", b"same", None);
    assert!(detect_cross_document_drift(&[&a, &b]).is_empty());
  }

  #[test]
  fn equal_stems_do_not_drift() {
    let a = evidence("statement.pdf", b"one", None);
    let b = evidence("statement.docx", b"two", None);
    assert!(detect_cross_document_drift(&[&a, &b]).is_empty());
  }

  #[test]
  fn unrelated_names_do_not_drift() {
    let a = evidence("invoice.pdf", b"one", None);
    let b = evidence("receipt.pdf", b"two", None);
    assert!(detect_cross_document_drift(&[&a, &b]).is_empty());
  }

  #[test]
  fn drift_explanation_is_order_independent() {
    let a = evidence("statement.pdf", b"one", None);
    let b = evidence("statement_v2.pdf", b"two", None);

    let forward = detect_cross_document_drift(&[&a, &b]);
    let reversed = detect_cross_document_drift(&[&b, &a]);
    assert_eq!(forward[0].key(), reversed[0].key());
  }

  // ── Metadata mismatch ─────────────────────────────────────────────────

  #[test]
  fn future_date_in_text_mismatches() {
    let e = evidence(
      "memo.pdf",
      b"memo",
      Some("meeting rescheduled to 2024-09-30"),
    );

    let detections = detect_metadata_mismatch(&[&e]);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].kind, ContradictionKind::MetadataMismatch);
    assert_eq!(detections[0].sources, vec![e.evidence_id]);
    assert!(detections[0].explanation.contains("2024-09-30"));
  }

  #[test]
  fn past_or_same_day_dates_do_not_mismatch() {
    let e = evidence(
      "memo.pdf",
      b"memo",
      Some("signed 2024-05-20, countersigned 2024-06-01"),
    );
    assert!(detect_metadata_mismatch(&[&e]).is_empty());
  }

  #[test]
  fn no_text_no_mismatch() {
    let e = evidence("memo.pdf", b"memo", None);
    assert!(detect_metadata_mismatch(&[&e]).is_empty());
  }

  // ── Omission ──────────────────────────────────────────────────────────

  #[test]
  fn unresolved_exhibit_reference_is_an_omission() {
    let citing = evidence("brief.pdf", b"brief", Some("see Exhibit A-7 for the full ledger"));
    let other = evidence("unrelated.pdf", b"x", None);

    let detections = detect_omissions(&[&citing, &other]);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].kind, ContradictionKind::Omission);
    assert_eq!(detections[0].sources, vec![citing.evidence_id]);
    assert!(detections[0].explanation.contains("a-7"));
  }

  #[test]
  fn resolved_reference_is_not_an_omission() {
    let citing = evidence("brief.pdf", b"brief", Some("see Exhibit A-7"));
    let exhibit = evidence("exhibit-A-7-ledger.pdf", b"ledger", None);
    assert!(detect_omissions(&[&citing, &exhibit]).is_empty());
  }
}

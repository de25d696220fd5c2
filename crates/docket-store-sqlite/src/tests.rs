//! Integration tests for `SqliteStore` against an in-memory database.

use docket_core::{
  evidence::{EvidenceRef, NewEvidence},
  fingerprint::fingerprint,
  report::{Contradiction, ContradictionKind, NewReport, TimelineEvent},
  store::CaseStore,
  verify::VerificationTier,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn artifact(name: &str, content: &[u8]) -> NewEvidence {
  NewEvidence::new(
    name,
    content.to_vec(),
    "application/pdf",
    "us-ca",
    "America/Los_Angeles",
  )
}

fn report(title: &str, refs: Vec<EvidenceRef>) -> NewReport {
  let mut input = NewReport::new(title, "us-ca", "America/Los_Angeles");
  input.evidence_refs = refs;
  input
}

// ─── Evidence ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_evidence() {
  let s = store().await;

  let put = s
    .put_evidence(artifact("statement.pdf", b"witness statement"))
    .await
    .unwrap();
  assert_eq!(put.name, "statement.pdf");
  assert_eq!(put.size, 17);
  assert_eq!(put.digest, fingerprint(b"witness statement"));

  let got = s.get_evidence(put.evidence_id).await.unwrap().unwrap();
  assert_eq!(got.evidence_id, put.evidence_id);
  assert_eq!(got.content, b"witness statement");
  assert_eq!(got.digest, put.digest);
  assert_eq!(got.jurisdiction, "us-ca");
  assert_eq!(got.timezone, "America/Los_Angeles");
  assert!(got.extracted_text.is_none());
}

#[tokio::test]
async fn get_evidence_missing_returns_none() {
  let s = store().await;
  let result = s.get_evidence(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn identical_content_identical_digest() {
  let s = store().await;

  let a = s.put_evidence(artifact("a.pdf", b"same bytes")).await.unwrap();
  let b = s.put_evidence(artifact("b.pdf", b"same bytes")).await.unwrap();

  assert_eq!(a.digest, b.digest);
  assert_ne!(a.evidence_id, b.evidence_id);
}

#[tokio::test]
async fn metadata_roundtrip() {
  let s = store().await;

  let mut input = artifact("exhibit.pdf", b"payload");
  input.metadata.insert("custodian".into(), "records dept".into());
  input.metadata.insert("batch".into(), "2024-01".into());

  let put = s.put_evidence(input).await.unwrap();
  let got = s.get_evidence(put.evidence_id).await.unwrap().unwrap();

  assert_eq!(got.metadata.get("custodian").map(String::as_str), Some("records dept"));
  assert_eq!(got.metadata.get("batch").map(String::as_str), Some("2024-01"));
}

#[tokio::test]
async fn attach_extracted_text() {
  let s = store().await;

  let mut evidence = s
    .put_evidence(artifact("scan.pdf", b"\x25PDF scanned bytes"))
    .await
    .unwrap();
  evidence.extracted_text = Some("Payment received on 2024-01-05.".into());

  s.update_evidence(evidence.clone()).await.unwrap();

  let got = s.get_evidence(evidence.evidence_id).await.unwrap().unwrap();
  assert_eq!(
    got.extracted_text.as_deref(),
    Some("Payment received on 2024-01-05.")
  );
  assert_eq!(got.digest, evidence.digest);
}

#[tokio::test]
async fn update_with_tampered_content_errors() {
  let s = store().await;

  let mut evidence = s
    .put_evidence(artifact("original.pdf", b"original bytes"))
    .await
    .unwrap();
  evidence.content = b"altered bytes".to_vec();

  let err = s.update_evidence(evidence).await.unwrap_err();
  assert!(matches!(err, crate::Error::DigestMismatch(_)));
}

#[tokio::test]
async fn update_missing_evidence_errors() {
  let s = store().await;

  let mut evidence = s
    .put_evidence(artifact("present.pdf", b"bytes"))
    .await
    .unwrap();
  s.clear_all().await.unwrap();
  evidence.extracted_text = Some("late text".into());

  let err = s.update_evidence(evidence).await.unwrap_err();
  assert!(matches!(err, crate::Error::EvidenceNotFound(_)));
}

// ─── Ledger append ───────────────────────────────────────────────────────────

#[tokio::test]
async fn chapters_increase_without_gaps() {
  let s = store().await;

  let r1 = s.append_report(report("Intake", vec![])).await.unwrap();
  let r2 = s.append_report(report("Analysis", vec![])).await.unwrap();
  let r3 = s.append_report(report("Follow-up", vec![])).await.unwrap();

  assert_eq!(r1.chapter_index, 1);
  assert_eq!(r2.chapter_index, 2);
  assert_eq!(r3.chapter_index, 3);
  assert_eq!(r1.created_at, r1.updated_at);
}

#[tokio::test]
async fn snapshot_orders_reports_per_ledger() {
  let s = store().await;

  // Titles deliberately out of lexicographic order; the ledger order is
  // creation order, nothing else.
  let ids = [
    s.append_report(report("zulu", vec![])).await.unwrap().report_id,
    s.append_report(report("alpha", vec![])).await.unwrap().report_id,
    s.append_report(report("mike", vec![])).await.unwrap().report_id,
  ];

  let snapshot = s.get_all_indexed().await.unwrap();
  assert_eq!(snapshot.reports.len(), 3);

  let got: Vec<Uuid> = snapshot.reports.iter().map(|r| r.report_id).collect();
  assert_eq!(got, ids);

  let chapters: Vec<u32> =
    snapshot.reports.iter().map(|r| r.chapter_index).collect();
  assert_eq!(chapters, vec![1, 2, 3]);
}

#[tokio::test]
async fn report_payload_roundtrip() {
  let s = store().await;

  let evidence = s
    .put_evidence(artifact("ledger.pdf", b"account ledger"))
    .await
    .unwrap();

  let mut input = report("Review", vec![EvidenceRef::of(&evidence)]);
  input.contradictions.push(Contradiction {
    kind:         ContradictionKind::Omission,
    actor:        None,
    claim_a:      None,
    claim_b:      None,
    sources:      vec![evidence.evidence_id],
    explanation:  "\"ledger.pdf\" references \"a-7\" but no matching evidence is in the case file.".into(),
    verification: VerificationTier::Verified,
  });
  input.timeline.push(TimelineEvent {
    date:        chrono::NaiveDate::from_ymd_opt(2024, 1, 5),
    description: "Payment recorded".into(),
    sources:     vec![evidence.evidence_id],
  });

  let appended = s.append_report(input).await.unwrap();

  let snapshot = s.get_all_indexed().await.unwrap();
  let got = &snapshot.reports[0];
  assert_eq!(got.report_id, appended.report_id);
  assert_eq!(got.contradictions.len(), 1);
  assert_eq!(got.contradictions[0].kind, ContradictionKind::Omission);
  assert_eq!(
    got.contradictions[0].verification,
    VerificationTier::Verified
  );
  assert_eq!(got.timeline.len(), 1);
  assert_eq!(got.evidence_refs, vec![EvidenceRef::of(&evidence)]);
}

// ─── Indexed reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_restricts_evidence_to_referenced() {
  let s = store().await;

  let cited = s
    .put_evidence(artifact("cited.pdf", b"cited content"))
    .await
    .unwrap();
  let orphan = s
    .put_evidence(artifact("orphan.pdf", b"never referenced"))
    .await
    .unwrap();

  s.append_report(report("Review", vec![EvidenceRef::of(&cited)]))
    .await
    .unwrap();

  let snapshot = s.get_all_indexed().await.unwrap();
  assert_eq!(snapshot.evidence.len(), 1);
  assert_eq!(snapshot.evidence[0].evidence_id, cited.evidence_id);
  assert!(
    snapshot
      .evidence
      .iter()
      .all(|e| e.evidence_id != orphan.evidence_id)
  );
}

#[tokio::test]
async fn snapshot_tolerates_dangling_evidence_refs() {
  let s = store().await;

  let dangling = EvidenceRef {
    evidence_id: Uuid::new_v4(),
    digest:      fingerprint(b"long gone"),
  };
  let appended = s
    .append_report(report("Review", vec![dangling]))
    .await
    .unwrap();

  let snapshot = s.get_all_indexed().await.unwrap();
  assert_eq!(snapshot.reports.len(), 1);
  assert_eq!(snapshot.reports[0].report_id, appended.report_id);
  assert!(snapshot.evidence.is_empty());
}

#[tokio::test]
async fn snapshot_of_empty_store_is_empty() {
  let s = store().await;
  let snapshot = s.get_all_indexed().await.unwrap();
  assert!(snapshot.reports.is_empty());
  assert!(snapshot.evidence.is_empty());
}

// ─── Bulk clear ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn clear_all_empties_everything() {
  let s = store().await;

  let evidence = s
    .put_evidence(artifact("doomed.pdf", b"doomed"))
    .await
    .unwrap();
  s.append_report(report("Doomed", vec![EvidenceRef::of(&evidence)]))
    .await
    .unwrap();

  s.clear_all().await.unwrap();

  let snapshot = s.get_all_indexed().await.unwrap();
  assert!(snapshot.reports.is_empty());
  assert!(snapshot.evidence.is_empty());
  assert!(s.get_evidence(evidence.evidence_id).await.unwrap().is_none());
}

#[tokio::test]
async fn clearing_resets_the_ledger() {
  let s = store().await;

  s.append_report(report("One", vec![])).await.unwrap();
  s.append_report(report("Two", vec![])).await.unwrap();
  s.clear_all().await.unwrap();

  let fresh = s.append_report(report("Restart", vec![])).await.unwrap();
  assert_eq!(fresh.chapter_index, 1);
}

//! Multi-pass detection and consensus reduction.
//!
//! The detectors run [`CONSENSUS_PASSES`] times, each pass over a freshly
//! shuffled copy of the evidence list. Detections collapse across passes
//! through the order-independent key from [`Detection::key`], and each
//! unique key's occurrence count classifies into a verification tier. The
//! shuffling emulates independent-pass corroboration; reproducibility comes
//! from the key normalisation, never from the shuffle order.

use std::collections::{BTreeMap, BTreeSet};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use docket_core::{
  evidence::Evidence,
  ledger::CaseSnapshot,
  report::{Contradiction, ContradictionKind},
  verify::{CONSENSUS_PASSES, VerificationTier},
};
use uuid::Uuid;

use crate::detect::{Detection, detect_all};

type Key = (ContradictionKind, Vec<Uuid>, String);

/// Detect contradictions across the reports and evidence of `snapshot`.
///
/// Same logical input ⇒ same output set and tiers, regardless of input
/// order and of the shuffle seeds. A scope with fewer than two evidence
/// items yields an empty result.
pub fn find_contradictions(snapshot: &CaseSnapshot) -> Vec<Contradiction> {
  let seeds = std::array::from_fn(|_| rand::random());
  find_contradictions_seeded(snapshot, seeds)
}

/// [`find_contradictions`] with caller-supplied shuffle seeds, one per
/// pass. Exposed so tests can pin the shuffles.
pub fn find_contradictions_seeded(
  snapshot: &CaseSnapshot,
  seeds: [u64; CONSENSUS_PASSES],
) -> Vec<Contradiction> {
  if snapshot.evidence.len() < 2 {
    return Vec::new();
  }

  let mut tallies: BTreeMap<Key, (usize, Detection)> = BTreeMap::new();

  for seed in seeds {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scope: Vec<&Evidence> = snapshot.evidence.iter().collect();
    scope.shuffle(&mut rng);

    // Count each key at most once per pass; agreement is measured across
    // passes, not within one.
    let mut seen_this_pass: BTreeSet<Key> = BTreeSet::new();
    for detection in detect_all(&scope) {
      let key = detection.key();
      if seen_this_pass.insert(key.clone()) {
        tallies.entry(key).or_insert((0, detection)).0 += 1;
      }
    }
  }

  tracing::debug!(
    unique_detections = tallies.len(),
    passes = CONSENSUS_PASSES,
    "consensus reduction complete"
  );

  tallies
    .into_iter()
    .map(|((kind, sources, explanation), (count, _detection))| Contradiction {
      kind,
      actor: None,
      claim_a: None,
      claim_b: None,
      sources,
      explanation,
      verification: VerificationTier::from_agreement(count),
    })
    .collect()
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

  fn snapshot(evidence: Vec<Evidence>) -> CaseSnapshot {
    CaseSnapshot { reports: vec![], evidence }
  }

  fn case_fixture() -> CaseSnapshot {
    snapshot(vec![
      evidence("statement.pdf", b"first draft", None),
      evidence("statement_v2.pdf", b"second draft", None),
      evidence(
        "memo.pdf",
        b"memo",
        Some("rescheduled to 2024-09-30, see Exhibit A-7"),
      ),
    ])
  }

  fn keys(
    contradictions: &[Contradiction],
  ) -> Vec<(ContradictionKind, Vec<Uuid>, String, VerificationTier)> {
    contradictions
      .iter()
      .map(|c| {
        let mut sources = c.sources.clone();
        sources.sort();
        (c.kind, sources, c.explanation.clone(), c.verification)
      })
      .collect()
  }

  #[test]
  fn deterministic_detectors_reach_full_consensus() {
    let case = case_fixture();
    let found = find_contradictions_seeded(&case, [1, 2, 3]);

    // One drift pair, one future date, one unresolved exhibit.
    assert_eq!(found.len(), 3);
    assert!(
      found
        .iter()
        .all(|c| c.verification == VerificationTier::Verified)
    );
  }

  #[test]
  fn output_is_invariant_under_input_permutation() {
    let case = case_fixture();
    let mut reversed = case.clone();
    reversed.evidence.reverse();

    let a = find_contradictions_seeded(&case, [7, 8, 9]);
    let b = find_contradictions_seeded(&reversed, [1000, 2000, 3000]);

    assert_eq!(keys(&a), keys(&b));
  }

  #[test]
  fn drift_pair_detected_exactly_once() {
    let a = evidence("statement.pdf", b"first", None);
    let b = evidence("statement_v2.pdf", b"second", None);
    let ids = [a.evidence_id, b.evidence_id];

    let found = find_contradictions_seeded(&snapshot(vec![a, b]), [4, 5, 6]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, ContradictionKind::CrossDocumentDrift);
    assert!(ids.iter().all(|id| found[0].sources.contains(id)));
  }

  #[test]
  fn scope_below_two_items_is_empty() {
    assert!(find_contradictions_seeded(&snapshot(vec![]), [1, 2, 3]).is_empty());

    let single = evidence(
      "memo.pdf",
      b"memo",
      Some("see Exhibit A-7, rescheduled to 2030-01-01"),
    );
    assert!(
      find_contradictions_seeded(&snapshot(vec![single]), [1, 2, 3]).is_empty()
    );
  }

  #[test]
  fn sources_are_sorted_in_output() {
    let case = case_fixture();
    let found = find_contradictions_seeded(&case, [11, 12, 13]);
    for c in &found {
      let mut sorted = c.sources.clone();
      sorted.sort();
      assert_eq!(c.sources, sorted);
    }
  }
}

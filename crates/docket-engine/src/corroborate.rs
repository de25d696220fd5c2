//! Multi-invocation corroboration of analysis-oracle findings.
//!
//! The oracle is asked the same question [`CONSENSUS_PASSES`] times; how
//! many invocations agree on a finding determines its verification tier,
//! through the same classifier the contradiction engine uses. A failed or
//! malformed invocation simply contributes no agreement — only when every
//! invocation fails does the whole operation error, so the caller can show
//! a neutral message without persisting anything.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::warn;

use docket_core::{
  oracle::{AnalysisOracle, CollaboratorError, OracleFinding, OracleRequest},
  report::Finding,
  verify::{CONSENSUS_PASSES, VerificationTier},
};

#[derive(Debug, Error)]
pub enum CorroborateError {
  #[error("analysis oracle unavailable: {0}")]
  OracleUnavailable(#[source] CollaboratorError),
}

type Key = (String, String, String);

/// Invoke `oracle` once per consensus pass and reduce the returned findings
/// into tier-classified [`Finding`]s, keyed on (title, trigger, source).
pub async fn corroborate_findings<O>(
  oracle: &O,
  request: OracleRequest<'_>,
) -> Result<Vec<Finding>, CorroborateError>
where
  O: AnalysisOracle + ?Sized,
{
  let mut tallies: BTreeMap<Key, (usize, OracleFinding)> = BTreeMap::new();
  let mut completed = 0usize;
  let mut last_error: Option<CollaboratorError> = None;

  for pass in 0..CONSENSUS_PASSES {
    match oracle.analyze(request).await {
      Ok(findings) => {
        completed += 1;
        let mut seen_this_pass: BTreeSet<Key> = BTreeSet::new();
        for finding in findings {
          let key = (
            finding.title.clone(),
            finding.trigger.clone(),
            finding.source.clone(),
          );
          if seen_this_pass.insert(key.clone()) {
            tallies.entry(key).or_insert((0, finding)).0 += 1;
          }
        }
      }
      Err(e) => {
        warn!(pass, error = %e, "analysis oracle invocation failed");
        last_error = Some(e);
      }
    }
  }

  if completed == 0 {
    let cause = last_error.unwrap_or_else(|| {
      CollaboratorError::Unavailable("analysis oracle produced no responses".into())
    });
    return Err(CorroborateError::OracleUnavailable(cause));
  }

  Ok(
    tallies
      .into_values()
      .map(|(count, f)| Finding {
        title:        f.title,
        trigger:      f.trigger,
        source:       f.source,
        rationale:    f.rationale,
        verification: Some(VerificationTier::from_agreement(count)),
        highlights:   f.highlights,
      })
      .collect(),
  )
}

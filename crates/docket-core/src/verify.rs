//! Verification tiers — confidence labels derived from multi-pass agreement.
//!
//! Both the contradiction engine and oracle corroboration run the same
//! analysis [`CONSENSUS_PASSES`] times and count how many passes agree on
//! each finding. That count maps to one of three fixed tiers. The mapping
//! lives here so every producer of tiered results classifies identically.

use serde::{Deserialize, Serialize};

/// How many independent passes each consensus analysis runs.
pub const CONSENSUS_PASSES: usize = 3;

/// One of three fixed confidence labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationTier {
  Verified,
  Consensus,
  Inconclusive,
}

impl VerificationTier {
  /// Classify an agreement count out of [`CONSENSUS_PASSES`].
  pub fn from_agreement(agreeing: usize) -> Self {
    match agreeing {
      n if n >= CONSENSUS_PASSES => Self::Verified,
      2 => Self::Consensus,
      _ => Self::Inconclusive,
    }
  }

  /// The user-facing label for this tier.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Verified => "Verified (3/3)",
      Self::Consensus => "Consensus (2/3)",
      Self::Inconclusive => "Inconclusive (≤1/3)",
    }
  }
}

impl std::fmt::Display for VerificationTier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn thresholds() {
    assert_eq!(VerificationTier::from_agreement(3), VerificationTier::Verified);
    assert_eq!(VerificationTier::from_agreement(2), VerificationTier::Consensus);
    assert_eq!(
      VerificationTier::from_agreement(1),
      VerificationTier::Inconclusive
    );
    assert_eq!(
      VerificationTier::from_agreement(0),
      VerificationTier::Inconclusive
    );
  }

  #[test]
  fn labels() {
    assert_eq!(VerificationTier::Verified.label(), "Verified (3/3)");
    assert_eq!(VerificationTier::Consensus.label(), "Consensus (2/3)");
    assert_eq!(VerificationTier::Inconclusive.label(), "Inconclusive (≤1/3)");
  }
}

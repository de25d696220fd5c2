//! The contradiction-detection engine.
//!
//! Pure computation over an already-loaded case: heuristic detectors run
//! [`docket_core::verify::CONSENSUS_PASSES`] times over shuffled copies of
//! the evidence list, and repeated detections are reduced through an
//! order-independent key into consensus-classified contradiction records.
//! The same tier classifier also backs multi-invocation corroboration of
//! analysis-oracle findings.

pub mod corroborate;
pub mod detect;
pub mod engine;
pub mod scan;

pub use corroborate::{CorroborateError, corroborate_findings};
pub use engine::{find_contradictions, find_contradictions_seeded};

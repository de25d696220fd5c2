//! The `CaseStore` trait and its read/write contract.
//!
//! The trait is implemented by storage backends (e.g. `docket-store-sqlite`).
//! Higher layers (`docket-api`, `docket-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  evidence::{Evidence, NewEvidence},
  ledger::CaseSnapshot,
  report::{NewReport, Report},
};

/// Abstraction over a docket case store backend.
///
/// The store is single-writer: all mutating operations on the ledger (index
/// and report together) are serialised relative to each other, so a second
/// `append_report` never observes a half-updated index. Reads see a
/// consistent snapshot — fully before or fully after any mutation.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Evidence ──────────────────────────────────────────────────────────

  /// Ingest an artifact: compute its content digest, assign a fresh id and
  /// timestamp, persist the record and return it.
  fn put_evidence(
    &self,
    input: NewEvidence,
  ) -> impl Future<Output = Result<Evidence, Self::Error>> + Send + '_;

  /// Full-record overwrite keyed by id; used only to attach extracted text
  /// after ingest.
  ///
  /// Returns an error if the record does not exist or if the overwrite
  /// would change the stored content digest.
  fn update_evidence(
    &self,
    evidence: Evidence,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve evidence by id. Returns `None` if not found.
  fn get_evidence(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Evidence>, Self::Error>> + Send + '_;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Append a report to the case ledger.
  ///
  /// Assigns a fresh id, both timestamps and the next chapter index, then
  /// persists the report record and the updated index as a single logical
  /// unit — the index must never reference a report that was not durably
  /// written.
  fn append_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Return all reports in ledger order plus the evidence they reference.
  ///
  /// Never returns a report whose id is missing from the index, and never
  /// returns evidence unreferenced by any returned report. Evidence
  /// references that no longer resolve are excluded silently.
  fn get_all_indexed(
    &self,
  ) -> impl Future<Output = Result<CaseSnapshot, Self::Error>> + Send + '_;

  // ── Bulk clear ────────────────────────────────────────────────────────

  /// Atomically empty the evidence, report and index collections.
  ///
  /// Purging derived artifacts (sealed exports) is a caller concern,
  /// forwarded to the rendering collaborator — it has no effect here.
  fn clear_all(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

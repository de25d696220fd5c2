//! Error type for `docket-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] docket_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to overwrite evidence that was not found.
  #[error("evidence not found: {0}")]
  EvidenceNotFound(uuid::Uuid),

  /// An overwrite would have changed the stored content digest.
  #[error("digest mismatch for evidence {0}: content is immutable")]
  DigestMismatch(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

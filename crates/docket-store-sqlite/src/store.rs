//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use docket_core::{
  evidence::{Evidence, EvidenceRef, NewEvidence},
  fingerprint::fingerprint,
  ledger::{CaseSnapshot, ReportIndex},
  report::{NewReport, Report},
  store::CaseStore,
};

use crate::{
  Error, Result,
  encode::{
    RawEvidence, RawReport, encode_contradictions, encode_dt, encode_findings,
    encode_metadata, encode_refs, encode_timeline, encode_uuid,
  },
  schema::{LEDGER_META_KEY, SCHEMA},
};

/// Wrap a non-database error for transport out of a connection closure.
fn other(
  e: impl std::error::Error + Send + Sync + 'static,
) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A docket case store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// execute on one dedicated thread, which is what serialises ledger
/// mutations: no append can observe another append's half-updated index.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the stored digest for an evidence id, if the row exists.
  async fn stored_digest(&self, id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let digest: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT digest FROM evidence WHERE evidence_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(digest)
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Evidence ──────────────────────────────────────────────────────────────

  async fn put_evidence(&self, input: NewEvidence) -> Result<Evidence> {
    let evidence = Evidence {
      evidence_id:    Uuid::new_v4(),
      digest:         fingerprint(&input.content),
      size:           input.content.len() as u64,
      name:           input.name,
      media_type:     input.media_type,
      content:        input.content,
      created_at:     Utc::now(),
      jurisdiction:   input.jurisdiction,
      timezone:       input.timezone,
      metadata:       input.metadata,
      extracted_text: None,
    };

    let id_str       = encode_uuid(evidence.evidence_id);
    let name         = evidence.name.clone();
    let size         = evidence.size as i64;
    let media_type   = evidence.media_type.clone();
    let content      = evidence.content.clone();
    let digest       = evidence.digest.clone();
    let at_str       = encode_dt(evidence.created_at);
    let jurisdiction = evidence.jurisdiction.clone();
    let timezone     = evidence.timezone.clone();
    let metadata_str = encode_metadata(&evidence.metadata)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO evidence (
             evidence_id, name, size, media_type, content, digest,
             created_at, jurisdiction, timezone, metadata, extracted_text
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL)",
          rusqlite::params![
            id_str,
            name,
            size,
            media_type,
            content,
            digest,
            at_str,
            jurisdiction,
            timezone,
            metadata_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(evidence)
  }

  async fn update_evidence(&self, evidence: Evidence) -> Result<()> {
    let id = evidence.evidence_id;

    let stored = self
      .stored_digest(id)
      .await?
      .ok_or(Error::EvidenceNotFound(id))?;

    // Content is immutable: the incoming record must carry bytes that hash
    // to the digest already on disk.
    let computed = fingerprint(&evidence.content);
    if computed != stored || evidence.digest != stored {
      return Err(Error::DigestMismatch(id));
    }

    let id_str       = encode_uuid(id);
    let name         = evidence.name;
    let size         = evidence.size as i64;
    let media_type   = evidence.media_type;
    let at_str       = encode_dt(evidence.created_at);
    let jurisdiction = evidence.jurisdiction;
    let timezone     = evidence.timezone;
    let metadata_str = encode_metadata(&evidence.metadata)?;
    let text         = evidence.extracted_text;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE evidence SET
             name = ?2, size = ?3, media_type = ?4, created_at = ?5,
             jurisdiction = ?6, timezone = ?7, metadata = ?8,
             extracted_text = ?9
           WHERE evidence_id = ?1",
          rusqlite::params![
            id_str,
            name,
            size,
            media_type,
            at_str,
            jurisdiction,
            timezone,
            metadata_str,
            text,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn get_evidence(&self, id: Uuid) -> Result<Option<Evidence>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvidence> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT evidence_id, name, size, media_type, content, digest,
                      created_at, jurisdiction, timezone, metadata,
                      extracted_text
               FROM evidence WHERE evidence_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEvidence {
                  evidence_id:    row.get(0)?,
                  name:           row.get(1)?,
                  size:           row.get(2)?,
                  media_type:     row.get(3)?,
                  content:        row.get(4)?,
                  digest:         row.get(5)?,
                  created_at:     row.get(6)?,
                  jurisdiction:   row.get(7)?,
                  timezone:       row.get(8)?,
                  metadata:       row.get(9)?,
                  extracted_text: row.get(10)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvidence::into_evidence).transpose()
  }

  // ── Ledger ────────────────────────────────────────────────────────────────

  async fn append_report(&self, input: NewReport) -> Result<Report> {
    let report_id = Uuid::new_v4();
    let now       = Utc::now();

    let id_str             = encode_uuid(report_id);
    let title              = input.title.clone();
    let at_str             = encode_dt(now);
    let jurisdiction       = input.jurisdiction.clone();
    let timezone           = input.timezone.clone();
    let refs_str           = encode_refs(&input.evidence_refs)?;
    let findings_str       = encode_findings(&input.findings)?;
    let contradictions_str = encode_contradictions(&input.contradictions)?;
    let timeline_str       = encode_timeline(&input.timeline)?;

    // The report row and the index update commit together: the index can
    // never reference a report that was not durably written, and the report
    // row lands first inside the transaction.
    let chapter: u32 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let meta: Option<(String, i64)> = tx
          .query_row(
            "SELECT order_json, last_chapter_index FROM ledger_meta
             WHERE meta_key = ?1",
            rusqlite::params![LEDGER_META_KEY],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        // Lazily created on first append.
        let mut index = match meta {
          Some((order_json, last)) => {
            ReportIndex::from_parts(&order_json, last as u32).map_err(other)?
          }
          None => ReportIndex::default(),
        };

        let chapter = index.assign_next(report_id);
        let order_json = index.order_json().map_err(other)?;

        tx.execute(
          "INSERT INTO reports (
             report_id, title, chapter_index, created_at, updated_at,
             jurisdiction, timezone, evidence_refs, findings,
             contradictions, timeline
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            title,
            chapter as i64,
            at_str,
            at_str,
            jurisdiction,
            timezone,
            refs_str,
            findings_str,
            contradictions_str,
            timeline_str,
          ],
        )?;

        tx.execute(
          "INSERT INTO ledger_meta (meta_key, order_json, last_chapter_index)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(meta_key) DO UPDATE SET
             order_json = excluded.order_json,
             last_chapter_index = excluded.last_chapter_index",
          rusqlite::params![
            LEDGER_META_KEY,
            order_json,
            index.last_chapter_index as i64,
          ],
        )?;

        tx.commit()?;
        Ok(chapter)
      })
      .await?;

    Ok(Report {
      report_id,
      title:          input.title,
      chapter_index:  chapter,
      created_at:     now,
      updated_at:     now,
      jurisdiction:   input.jurisdiction,
      timezone:       input.timezone,
      evidence_refs:  input.evidence_refs,
      findings:       input.findings,
      contradictions: input.contradictions,
      timeline:       input.timeline,
    })
  }

  async fn get_all_indexed(&self) -> Result<CaseSnapshot> {
    let (report_rows, evidence_rows): (Vec<RawReport>, Vec<RawEvidence>) = self
      .conn
      .call(|conn| {
        let meta: Option<String> = conn
          .query_row(
            "SELECT order_json FROM ledger_meta WHERE meta_key = ?1",
            rusqlite::params![LEDGER_META_KEY],
            |r| r.get(0),
          )
          .optional()?;

        let order: Vec<String> = match meta {
          Some(order_json) => {
            serde_json::from_str(&order_json).map_err(other)?
          }
          None => return Ok((Vec::new(), Vec::new())),
        };

        // Reports come back in ledger order. An id the index carries but
        // the reports table lacks is treated as not-yet-committed and
        // skipped.
        let mut report_stmt = conn.prepare(
          "SELECT report_id, title, chapter_index, created_at, updated_at,
                  jurisdiction, timezone, evidence_refs, findings,
                  contradictions, timeline
           FROM reports WHERE report_id = ?1",
        )?;

        let mut reports: Vec<RawReport> = Vec::new();
        let mut referenced: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for id in &order {
          let raw: Option<RawReport> = report_stmt
            .query_row(rusqlite::params![id], |row| {
              Ok(RawReport {
                report_id:      row.get(0)?,
                title:          row.get(1)?,
                chapter_index:  row.get(2)?,
                created_at:     row.get(3)?,
                updated_at:     row.get(4)?,
                jurisdiction:   row.get(5)?,
                timezone:       row.get(6)?,
                evidence_refs:  row.get(7)?,
                findings:       row.get(8)?,
                contradictions: row.get(9)?,
                timeline:       row.get(10)?,
              })
            })
            .optional()?;

          if let Some(raw) = raw {
            let refs: Vec<EvidenceRef> =
              serde_json::from_str(&raw.evidence_refs).map_err(other)?;
            for r in refs {
              let ref_id = encode_uuid(r.evidence_id);
              if seen.insert(ref_id.clone()) {
                referenced.push(ref_id);
              }
            }
            reports.push(raw);
          }
        }

        // Evidence restricted to the referenced set; dangling references
        // are excluded silently.
        let mut evidence_stmt = conn.prepare(
          "SELECT evidence_id, name, size, media_type, content, digest,
                  created_at, jurisdiction, timezone, metadata,
                  extracted_text
           FROM evidence WHERE evidence_id = ?1",
        )?;

        let mut evidence: Vec<RawEvidence> = Vec::new();
        for id in &referenced {
          let raw: Option<RawEvidence> = evidence_stmt
            .query_row(rusqlite::params![id], |row| {
              Ok(RawEvidence {
                evidence_id:    row.get(0)?,
                name:           row.get(1)?,
                size:           row.get(2)?,
                media_type:     row.get(3)?,
                content:        row.get(4)?,
                digest:         row.get(5)?,
                created_at:     row.get(6)?,
                jurisdiction:   row.get(7)?,
                timezone:       row.get(8)?,
                metadata:       row.get(9)?,
                extracted_text: row.get(10)?,
              })
            })
            .optional()?;

          if let Some(raw) = raw {
            evidence.push(raw);
          }
        }

        Ok((reports, evidence))
      })
      .await?;

    Ok(CaseSnapshot {
      reports:  report_rows
        .into_iter()
        .map(RawReport::into_report)
        .collect::<Result<_>>()?,
      evidence: evidence_rows
        .into_iter()
        .map(RawEvidence::into_evidence)
        .collect::<Result<_>>()?,
    })
  }

  // ── Bulk clear ────────────────────────────────────────────────────────────

  async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM evidence", [])?;
        tx.execute("DELETE FROM reports", [])?;
        tx.execute("DELETE FROM ledger_meta", [])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

//! SQL schema for the docket SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Evidence is content-addressed and immutable. The only UPDATE ever issued
-- against this table attaches extracted_text; content and digest never
-- change after ingest.
CREATE TABLE IF NOT EXISTS evidence (
    evidence_id    TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    size           INTEGER NOT NULL,
    media_type     TEXT NOT NULL,
    content        BLOB NOT NULL,
    digest         TEXT NOT NULL,    -- lowercase-hex SHA-512 of content
    created_at     TEXT NOT NULL,    -- ISO 8601 UTC; store-assigned
    jurisdiction   TEXT NOT NULL,
    timezone       TEXT NOT NULL,
    metadata       TEXT NOT NULL DEFAULT '{}',
    extracted_text TEXT
);

-- Reports are appended through the ledger and never edited except for
-- updated_at refreshes. Derived content is stored as JSON payloads.
CREATE TABLE IF NOT EXISTS reports (
    report_id      TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    chapter_index  INTEGER NOT NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    jurisdiction   TEXT NOT NULL,
    timezone       TEXT NOT NULL,
    evidence_refs  TEXT NOT NULL DEFAULT '[]',
    findings       TEXT NOT NULL DEFAULT '[]',
    contradictions TEXT NOT NULL DEFAULT '[]',
    timeline       TEXT NOT NULL DEFAULT '[]'
);

-- Singleton ledger index: insertion order + last assigned chapter number.
-- This row is the source of truth for report ordering; it is written in the
-- same transaction as each report insert.
CREATE TABLE IF NOT EXISTS ledger_meta (
    meta_key           TEXT PRIMARY KEY,
    order_json         TEXT NOT NULL,
    last_chapter_index INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS evidence_digest_idx ON evidence(digest);
CREATE INDEX IF NOT EXISTS reports_chapter_idx ON reports(chapter_index);

PRAGMA user_version = 1;
";

/// Primary key of the singleton [`ledger_meta`] row.
pub const LEDGER_META_KEY: &str = "case-ledger";

//! SQL schema for the Clairière SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Landing-page email opt-ins. Insert-only.
CREATE TABLE IF NOT EXISTS subscribers (
    subscriber_id TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expeditions (
    expedition_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- (name, birthday) is the identity key: it stands in for an account
-- without requiring credentials, and backstops concurrent identical joins.
CREATE TABLE IF NOT EXISTS expeditioners (
    expeditioner_id TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    birthday        TEXT NOT NULL,   -- ISO date, no time component
    created_at      TEXT NOT NULL,
    UNIQUE (name, birthday)
);

-- Many-to-many relation. Deleting an expedition cascades here and only
-- here; expeditioner records survive their expeditions.
CREATE TABLE IF NOT EXISTS memberships (
    expeditioner_id TEXT NOT NULL REFERENCES expeditioners(expeditioner_id),
    expedition_id   TEXT NOT NULL REFERENCES expeditions(expedition_id)
                         ON DELETE CASCADE,
    created_at      TEXT NOT NULL,
    UNIQUE (expeditioner_id, expedition_id)
);

CREATE INDEX IF NOT EXISTS memberships_expedition_idx
    ON memberships(expedition_id);
CREATE INDEX IF NOT EXISTS memberships_expeditioner_idx
    ON memberships(expeditioner_id);

PRAGMA user_version = 1;
";

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use pogen_app::{FieldKey, Record, RecordId, RecordInput, RecordKind, RecordLabel};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const APP_NAME: &str = "pogen";

const DEMO_RECORDS: &[(RecordKind, &[&str])] = &[
    (
        RecordKind::Supplier,
        &[
            "Harbor Fasteners Ltd.",
            "12 Wharf Road\nKowloon Bay\nHong Kong",
            "Ms. Lee",
            "+852 2345 6789",
        ],
    ),
    (
        RecordKind::ShipTo,
        &[
            "Northwind Assembly",
            "400 Industrial Pkwy\nDock 3\nColumbus, OH 43215",
            "Receiving",
            "+1 614 555 0100",
        ],
    ),
    (
        RecordKind::TradeTerms,
        &[
            "FOB Hong Kong",
            "Blue Anchor Logistics",
            "30% deposit with order\n70% against copy of B/L",
            "USD",
        ],
    ),
    (
        RecordKind::FooterTerms,
        &[
            "Export carton, palletized",
            "Please confirm receipt of this order.\nQuote PO number on all documents.",
            "Jordan Walker",
        ],
    ),
];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        debug!(path = %path.display(), "opened record store");
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates any missing record table, then checks every table carries the
    /// columns the form expects.
    pub fn bootstrap(&self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")?;
        validate_schema(&self.conn)
    }

    pub fn seed_demo_records(&self) -> Result<()> {
        for (kind, values) in DEMO_RECORDS {
            let fields = kind
                .fields()
                .iter()
                .copied()
                .zip(values.iter().map(|value| (*value).to_owned()))
                .collect();
            self.create_record(&RecordInput {
                kind: *kind,
                fields,
            })
            .with_context(|| format!("insert demo {kind}"))?;
        }
        Ok(())
    }

    /// Picker entries for one record kind, oldest first.
    pub fn list_labels(&self, kind: RecordKind) -> Result<Vec<RecordLabel>> {
        let sql = format!(
            "SELECT id, {} FROM {} ORDER BY id ASC",
            kind.label_field().as_str(),
            kind.table()
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("prepare {kind} labels query"))?;
        let rows = stmt
            .query_map([], |row| {
                let name: Option<String> = row.get(1)?;
                Ok(RecordLabel {
                    id: RecordId::new(row.get(0)?),
                    name: name.unwrap_or_default(),
                })
            })
            .with_context(|| format!("query {kind} labels"))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("collect {kind} labels"))
    }

    pub fn list_records(&self, kind: RecordKind) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT id, {} FROM {} ORDER BY id ASC",
            column_list(kind),
            kind.table()
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("prepare {kind} records query"))?;
        let rows = stmt
            .query_map([], |row| record_from_row(kind, row))
            .with_context(|| format!("query {kind} records"))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("collect {kind} records"))
    }

    pub fn get_record(&self, kind: RecordKind, id: RecordId) -> Result<Record> {
        let sql = format!(
            "SELECT id, {} FROM {} WHERE id = ?",
            column_list(kind),
            kind.table()
        );
        self.conn
            .query_row(&sql, params![id.get()], |row| record_from_row(kind, row))
            .optional()
            .with_context(|| format!("load {kind} {id}"))?
            .ok_or_else(|| {
                anyhow!(
                    "{} {id} not found -- run `pogen list {}` to see saved ids",
                    kind.label(),
                    kind.as_str()
                )
            })
    }

    /// Appends a record. Records are never updated, so every save gets a new id.
    pub fn create_record(&self, input: &RecordInput) -> Result<RecordId> {
        input.validate()?;
        let kind = input.kind;
        let placeholders = vec!["?"; kind.fields().len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            kind.table(),
            column_list(kind)
        );
        self.conn
            .execute(&sql, params_from_iter(input.column_values()))
            .with_context(|| format!("insert {kind}"))?;
        let id = RecordId::new(self.conn.last_insert_rowid());
        info!(kind = kind.as_str(), id = id.get(), "saved record");
        Ok(id)
    }

    pub fn record_count(&self, kind: RecordKind) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", kind.table()),
                [],
                |row| row.get(0),
            )
            .with_context(|| format!("count {kind} records"))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("POGEN_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set POGEN_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("pogen.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn column_list(kind: RecordKind) -> String {
    kind.fields()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn record_from_row(kind: RecordKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let mut fields = BTreeMap::new();
    for (offset, key) in kind.fields().iter().enumerate() {
        let value: Option<String> = row.get(offset + 1)?;
        fields.insert(*key, value.unwrap_or_default());
    }
    Ok(Record {
        id: RecordId::new(row.get(0)?),
        kind,
        fields,
    })
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for kind in RecordKind::ALL {
        let table = kind.table();
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a pogen-compatible database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = std::iter::once("id")
            .chain(kind.fields().iter().map(|key: &FieldKey| key.as_str()))
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; point [storage].db_path at a pogen database",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

#[cfg(test)]
mod tests {
    use super::Store;
    use anyhow::Result;
    use pogen_app::{RecordInput, RecordKind};

    #[test]
    fn bootstrap_is_idempotent() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.bootstrap()?;
        for kind in RecordKind::ALL {
            assert_eq!(store.record_count(kind)?, 0);
        }
        Ok(())
    }

    #[test]
    fn demo_records_cover_every_kind() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.seed_demo_records()?;
        for kind in RecordKind::ALL {
            let labels = store.list_labels(kind)?;
            assert_eq!(labels.len(), 1, "kind {kind}");
            assert!(!labels[0].name.is_empty(), "kind {kind}");
        }
        Ok(())
    }

    #[test]
    fn blank_record_is_accepted() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let id = store.create_record(&RecordInput::new(RecordKind::ShipTo))?;
        let record = store.get_record(RecordKind::ShipTo, id)?;
        assert!(record.fields.values().all(String::is_empty));
        assert_eq!(record.fields.len(), 4);
        Ok(())
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerState;
use crate::store::{SnapshotStore, SqliteStore};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, TransactionBehavior};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Teamledger", "teamledger"));

pub const DB_ENV: &str = "TEAMLEDGER_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("teamledger.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ledgers(
        id TEXT PRIMARY KEY,
        total_income TEXT NOT NULL DEFAULT '0',
        total_commission TEXT NOT NULL DEFAULT '0',
        net_payout TEXT NOT NULL DEFAULT '0',
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ledger_id TEXT NOT NULL,
        seq INTEGER NOT NULL,
        recorded_at TEXT NOT NULL,
        grp TEXT NOT NULL,
        direction TEXT NOT NULL CHECK(direction IN ('+','-')),
        amount TEXT NOT NULL,
        operator TEXT NOT NULL,
        commission TEXT NOT NULL,
        net TEXT NOT NULL,
        UNIQUE(ledger_id, seq),
        FOREIGN KEY(ledger_id) REFERENCES ledgers(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_records_ledger_grp ON records(ledger_id, grp);
    "#,
    )?;
    Ok(())
}

/// Load, transform and save one ledger under a single write lock.
///
/// The transaction is opened IMMEDIATE so two writers cannot both read the
/// same snapshot and lose one another's update.
pub fn with_ledger<F>(conn: &mut Connection, ledger: &str, f: F) -> Result<LedgerState>
where
    F: FnOnce(LedgerState) -> Result<LedgerState>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let next = {
        let store = SqliteStore::new(&tx, ledger);
        let current = store.load()?;
        let next = f(current)?;
        store.save(&next)?;
        next
    };
    tx.commit()?;
    Ok(next)
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Direction, LedgerState, Record, TIME_FORMAT, Transaction};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Durable home of one ledger's snapshot.
///
/// `load` returns the empty state when nothing was saved yet, and an error
/// when what was saved cannot be read back.
pub trait SnapshotStore {
    fn load(&self) -> Result<LedgerState>;
    fn save(&self, state: &LedgerState) -> Result<()>;
}

/// Snapshot kept in the `ledgers` / `records` tables.
///
/// `save` rewrites the ledger's rows without opening its own transaction;
/// callers that need load-apply-save to be atomic go through
/// `db::with_ledger`.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
    ledger: String,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection, ledger: &str) -> Self {
        Self {
            conn,
            ledger: ledger.to_string(),
        }
    }

    pub fn ledger(&self) -> &str {
        &self.ledger
    }
}

impl SnapshotStore for SqliteStore<'_> {
    fn load(&self) -> Result<LedgerState> {
        let totals: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT total_income, total_commission, net_payout FROM ledgers WHERE id=?1",
                params![&self.ledger],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        let Some((income, commission, net)) = totals else {
            return Ok(LedgerState::empty());
        };

        let mut stmt = self.conn.prepare(
            "SELECT seq, recorded_at, grp, direction, amount, operator, commission, net
             FROM records WHERE ledger_id=?1 ORDER BY seq",
        )?;
        let mut cur = stmt.query(params![&self.ledger])?;
        let mut records = Vec::new();
        while let Some(r) = cur.next()? {
            let seq: i64 = r.get(0)?;
            let time: String = r.get(1)?;
            let sign: String = r.get(3)?;
            let direction = sign
                .chars()
                .next()
                .and_then(Direction::from_sign)
                .ok_or_else(|| anyhow!("Invalid direction '{}' in record {}", sign, seq))?;
            let timestamp = NaiveDateTime::parse_from_str(&time, TIME_FORMAT)
                .with_context(|| format!("Invalid time '{}' in record {}", time, seq))?;
            records.push(Record {
                txn: Transaction {
                    group: r.get(2)?,
                    direction,
                    amount: column_decimal(&r.get::<_, String>(4)?, "amount", seq)?,
                    operator: r.get(5)?,
                    timestamp,
                },
                commission: column_decimal(&r.get::<_, String>(6)?, "commission", seq)?,
                net: column_decimal(&r.get::<_, String>(7)?, "net", seq)?,
            });
        }

        Ok(LedgerState::from_parts(
            records,
            total_decimal(&income, "total_income", &self.ledger)?,
            total_decimal(&commission, "total_commission", &self.ledger)?,
            total_decimal(&net, "net_payout", &self.ledger)?,
        ))
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        self.conn.execute(
            "INSERT INTO ledgers(id, total_income, total_commission, net_payout, updated_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET
                total_income=excluded.total_income,
                total_commission=excluded.total_commission,
                net_payout=excluded.net_payout,
                updated_at=excluded.updated_at",
            params![
                &self.ledger,
                state.total_income().to_string(),
                state.total_commission().to_string(),
                state.net_payout().to_string()
            ],
        )?;
        self.conn.execute(
            "DELETE FROM records WHERE ledger_id=?1",
            params![&self.ledger],
        )?;
        let mut ins = self.conn.prepare(
            "INSERT INTO records(ledger_id, seq, recorded_at, grp, direction, amount, operator, commission, net)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (seq, r) in state.records().iter().enumerate() {
            ins.execute(params![
                &self.ledger,
                seq as i64,
                r.txn.timestamp.format(TIME_FORMAT).to_string(),
                &r.txn.group,
                r.txn.direction.sign().to_string(),
                r.txn.amount.to_string(),
                &r.txn.operator,
                r.commission.to_string(),
                r.net.to_string()
            ])?;
        }
        info!(ledger = %self.ledger, records = state.records().len(), "saved ledger snapshot");
        Ok(())
    }
}

/// Snapshot as a single JSON document (`records` plus the three totals).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<LedgerState> {
        if !self.path.exists() {
            return Ok(LedgerState::empty());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Read snapshot {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Corrupt snapshot {}", self.path.display()))
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), records = state.records().len(), "wrote snapshot file");
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create directory {}", parent.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).with_context(|| format!("Write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Replace {}", path.display()))?;
    Ok(())
}

fn column_decimal(s: &str, column: &str, seq: i64) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in record {}", column, s, seq))
}

fn total_decimal(s: &str, column: &str, ledger: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' for ledger '{}'", column, s, ledger))
}

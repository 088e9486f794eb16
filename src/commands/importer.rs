// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::Aggregator;
use crate::db;
use crate::parser::Parser;
use crate::store::{JsonFileStore, SnapshotStore};
use crate::utils::load_config;
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// 1-based line numbers that matched no grammar.
    pub skipped: Vec<usize>,
}

pub fn handle(conn: &mut Connection, ledger: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("lines", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let summary = import_lines(conn, ledger, path, sub.get_flag("skip_invalid"))?;
            for line in &summary.skipped {
                eprintln!("Skipped unrecognized line {}", line);
            }
            println!("Imported {} records from {}", summary.imported, path);
        }
        Some(("snapshot", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let records = import_snapshot(conn, ledger, path)?;
            println!("Loaded snapshot {} ({} records)", path, records);
        }
        _ => {}
    }
    Ok(())
}

/// Records every message of a text file. Blank lines and lines starting with
/// `#` are ignored. Either all recognized lines land or none do.
pub fn import_lines(
    conn: &mut Connection,
    ledger: &str,
    path: &str,
    skip_invalid: bool,
) -> Result<ImportSummary> {
    let content = fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
    let cfg = load_config(conn)?;
    let parser = Parser::new(&cfg)?;
    let aggregator = Aggregator::new(cfg)?;
    let now = Local::now().naive_local();

    let mut txns = Vec::new();
    let mut summary = ImportSummary::default();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parser.parse_at(line, now) {
            Ok(txn) => txns.push(txn),
            Err(failure) if skip_invalid => {
                warn!(line = idx + 1, text = %failure.text, "skipping unrecognized line");
                summary.skipped.push(idx + 1);
            }
            Err(failure) => {
                return Err(anyhow!("{}:{}: {}", path, idx + 1, failure));
            }
        }
    }

    summary.imported = txns.len();
    db::with_ledger(conn, ledger, |state| {
        txns.into_iter()
            .try_fold(state, |state, txn| aggregator.apply(state, txn))
            .map_err(Into::into)
    })?;
    info!(ledger, path, imported = summary.imported, skipped = summary.skipped.len(), "imported messages");
    Ok(summary)
}

/// Replaces the ledger with the snapshot stored at `path`. The stored totals
/// are rebuilt from the snapshot's records; a disagreeing total is logged and
/// then discarded.
pub fn import_snapshot(conn: &mut Connection, ledger: &str, path: &str) -> Result<usize> {
    if !Path::new(path).is_file() {
        bail!("Snapshot {} not found", path);
    }
    let snapshot = JsonFileStore::new(path).load()?;
    let replayed = Aggregator::replay(snapshot.records())
        .with_context(|| format!("Snapshot {} cannot be replayed", path))?;
    for (name, stored, expected) in [
        ("total_income", snapshot.total_income(), replayed.total_income()),
        ("total_commission", snapshot.total_commission(), replayed.total_commission()),
        ("net_payout", snapshot.net_payout(), replayed.net_payout()),
    ] {
        if stored != expected {
            warn!(path, total = name, %stored, %expected, "snapshot total differs from its records, using the records");
        }
    }
    let records = replayed.records().len();
    db::with_ledger(conn, ledger, |_| Ok(replayed))?;
    info!(ledger, path, records, "loaded snapshot");
    Ok(records)
}

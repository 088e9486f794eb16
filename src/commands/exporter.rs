// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TIME_FORMAT;
use crate::store::{JsonFileStore, SnapshotStore, SqliteStore};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    export(conn, ledger, &fmt, out)?;
    println!("Exported ledger '{}' to {}", ledger, out);
    Ok(())
}

pub fn export(conn: &Connection, ledger: &str, fmt: &str, out: &str) -> Result<()> {
    let state = SqliteStore::new(conn, ledger).load()?;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "time", "group", "type", "amount", "operator", "commission", "net",
            ])?;
            for r in state.records() {
                wtr.write_record([
                    r.txn.timestamp.format(TIME_FORMAT).to_string(),
                    r.txn.group.clone(),
                    r.txn.direction.to_string(),
                    r.txn.amount.to_string(),
                    r.txn.operator.clone(),
                    r.commission.to_string(),
                    r.net.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => JsonFileStore::new(out).save(&state)?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    Ok(())
}

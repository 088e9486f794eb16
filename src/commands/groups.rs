// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::Aggregator;
use crate::models::GroupSummary;
use crate::store::{SnapshotStore, SqliteStore};
use crate::utils::{fmt_money, load_config, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    let data = breakdown(conn, ledger)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.group.clone(),
                    g.records.to_string(),
                    fmt_money(&g.income),
                    fmt_money(&g.commission),
                    fmt_money(&g.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Group", "Records", "Income", "Commission", "Net"], rows)
        );
    }
    Ok(())
}

pub fn breakdown(conn: &Connection, ledger: &str) -> Result<Vec<GroupSummary>> {
    let aggregator = Aggregator::new(load_config(conn)?)?;
    let state = SqliteStore::new(conn, ledger).load()?;
    Ok(aggregator.breakdown(&state)?)
}

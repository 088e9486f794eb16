// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TIME_FORMAT;
use crate::store::{SnapshotStore, SqliteStore};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.time.clone(),
                    r.group.clone(),
                    r.direction.clone(),
                    r.amount.clone(),
                    r.operator.clone(),
                    r.commission.clone(),
                    r.net.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Time", "Group", "Type", "Amount", "Operator", "Commission", "Net"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct HistoryRow {
    pub time: String,
    pub group: String,
    pub direction: String,
    pub amount: String,
    pub operator: String,
    pub commission: String,
    pub net: String,
}

pub fn query_rows(
    conn: &Connection,
    ledger: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<HistoryRow>> {
    let group = sub.get_one::<String>("group").map(|s| s.trim());
    let since = match sub.get_one::<String>("since") {
        Some(s) => Some(parse_date(s.trim())?),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let state = SqliteStore::new(conn, ledger).load()?;
    let data = state
        .records()
        .iter()
        .rev()
        .filter(|r| group.is_none_or(|g| r.txn.group == g))
        .filter(|r| since.is_none_or(|d| r.txn.timestamp.date() >= d))
        .take(limit)
        .map(|r| HistoryRow {
            time: r.txn.timestamp.format(TIME_FORMAT).to_string(),
            group: r.txn.group.clone(),
            direction: r.txn.direction.to_string(),
            amount: fmt_money(&r.txn.amount),
            operator: r.txn.operator.clone(),
            commission: fmt_money(&r.commission),
            net: fmt_money(&r.net),
        })
        .collect();
    Ok(data)
}

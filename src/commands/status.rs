// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{SnapshotStore, SqliteStore};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
pub struct Status {
    pub ledger: String,
    pub records: usize,
    pub total_income: String,
    pub total_commission: String,
    pub net_payout: String,
}

pub fn handle(conn: &Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    let status = status(conn, ledger)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &status)? {
        let rows = vec![
            vec!["Records".into(), status.records.to_string()],
            vec!["Total income".into(), status.total_income],
            vec!["Total commission".into(), status.total_commission],
            vec!["Net payout".into(), status.net_payout],
        ];
        println!("{}", pretty_table(&[status.ledger.as_str(), ""], rows));
    }
    Ok(())
}

pub fn status(conn: &Connection, ledger: &str) -> Result<Status> {
    let state = SqliteStore::new(conn, ledger).load()?;
    Ok(Status {
        ledger: ledger.to_string(),
        records: state.records().len(),
        total_income: fmt_money(&state.total_income()),
        total_commission: fmt_money(&state.total_commission()),
        net_payout: fmt_money(&state.net_payout()),
    })
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::Aggregator;
use crate::error::LedgerError;
use crate::models::{Direction, Record};
use crate::store::{SnapshotStore, SqliteStore};
use crate::utils::{fmt_money, load_config, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use rusqlite::Connection;

pub fn handle(conn: &Connection, ledger: &str) -> Result<()> {
    let rows = findings(conn, ledger)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn findings(conn: &Connection, ledger: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let state = SqliteStore::new(conn, ledger).load()?;

    // 1) Stored totals must be the running sum of stored deltas
    match Aggregator::replay(state.records()) {
        Ok(replayed) => {
            for (name, stored, expected) in [
                ("total_income", state.total_income(), replayed.total_income()),
                ("total_commission", state.total_commission(), replayed.total_commission()),
                ("net_payout", state.net_payout(), replayed.net_payout()),
            ] {
                if stored != expected {
                    rows.push(vec![
                        "totals_mismatch".into(),
                        format!("{} is {} but records sum to {}", name, fmt_money(&stored), fmt_money(&expected)),
                    ]);
                }
            }
        }
        Err(err) => rows.push(vec!["overflow".into(), err.to_string()]),
    }

    for (seq, r) in state.records().iter().enumerate() {
        if r.txn.amount < Decimal::ZERO {
            rows.push(vec!["negative_amount".into(), describe(seq, r)]);
        }
    }

    // 2) Checks against the current configuration
    let aggregator = match load_config(conn).and_then(|cfg| Aggregator::new(cfg).map_err(Into::into)) {
        Ok(a) => a,
        Err(err) => {
            rows.push(vec!["invalid_config".into(), err.to_string()]);
            return Ok(rows);
        }
    };
    for (seq, r) in state.records().iter().enumerate() {
        if !aggregator.config().is_valid_group(&r.txn.group) {
            rows.push(vec!["unknown_group".into(), describe(seq, r)]);
        }
        let d = aggregator.deltas(&r.txn);
        if d.commission != r.commission || d.net != r.net {
            rows.push(vec![
                "rate_changed".into(),
                format!(
                    "{}: stored {}/{}, current rates give {}/{}",
                    describe(seq, r),
                    fmt_money(&r.commission),
                    fmt_money(&r.net),
                    fmt_money(&d.commission),
                    fmt_money(&d.net)
                ),
            ]);
        }
    }

    // 3) Debits reduce group income but not the global income total
    if state
        .records()
        .iter()
        .any(|r| r.txn.direction == Direction::Debit)
    {
        let group_income = aggregator.breakdown(&state).and_then(|groups| {
            groups.iter().try_fold(Decimal::ZERO, |acc, g| {
                acc.checked_add(g.income)
                    .ok_or_else(|| LedgerError::Overflow("group income".into()))
            })
        });
        match group_income {
            Ok(group_income) => rows.push(vec![
                "debit_income_gap".into(),
                format!(
                    "total income {} excludes debits; group incomes sum to {}",
                    fmt_money(&state.total_income()),
                    fmt_money(&group_income)
                ),
            ]),
            Err(err) => rows.push(vec!["overflow".into(), err.to_string()]),
        }
    }

    Ok(rows)
}

fn describe(seq: usize, r: &Record) -> String {
    format!(
        "#{} {}{}{} by {}",
        seq + 1,
        r.txn.group,
        r.txn.direction.sign(),
        r.txn.amount,
        r.txn.operator
    )
}

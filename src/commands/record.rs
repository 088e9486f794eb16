// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::Aggregator;
use crate::db;
use crate::models::{LedgerState, Record};
use crate::parser::Parser;
use crate::utils::{fmt_money, load_config};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &mut Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    let text = sub.get_one::<String>("text").unwrap();
    let (record, state) = record_message(conn, ledger, text)?;
    println!("{}", receipt(&record, &state));
    Ok(())
}

/// Parse one message and append it to the ledger. An unrecognized message
/// leaves the ledger untouched.
pub fn record_message(
    conn: &mut Connection,
    ledger: &str,
    text: &str,
) -> Result<(Record, LedgerState)> {
    let cfg = load_config(conn)?;
    let parser = Parser::new(&cfg)?;
    let aggregator = Aggregator::new(cfg)?;

    let txn = match parser.parse(text) {
        Ok(txn) => txn,
        Err(failure) => {
            warn!(text = %failure.text, "unrecognized ledger message");
            return Err(anyhow!("{}. Use: {}", failure, parser.usage()));
        }
    };
    let state = db::with_ledger(conn, ledger, |state| {
        aggregator.apply(state, txn).map_err(Into::into)
    })?;
    let record = state
        .records()
        .last()
        .cloned()
        .context("Ledger is empty right after recording")?;
    Ok((record, state))
}

/// Reply shown to whoever sent the message.
pub fn receipt(record: &Record, state: &LedgerState) -> String {
    format!(
        "Recorded {} for {}\n\
         Amount: {}\n\
         Operator: {}\n\
         This commission: {}\n\
         This net payout: {}\n\
         \n\
         Total commission: {}\n\
         Total net payout: {}",
        record.txn.direction,
        record.txn.group,
        fmt_money(&record.txn.amount),
        record.txn.operator,
        fmt_money(&record.commission),
        fmt_money(&record.net),
        fmt_money(&state.total_commission()),
        fmt_money(&state.net_payout()),
    )
}

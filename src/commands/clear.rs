// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::Aggregator;
use crate::db;
use crate::utils::load_config;
use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, ledger: &str, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("Refusing to clear ledger '{}' without --yes", ledger);
    }
    let dropped = clear(conn, ledger)?;
    println!("Cleared ledger '{}' ({} records removed)", ledger, dropped);
    Ok(())
}

/// Resets the ledger to the empty state; returns how many records it held.
pub fn clear(conn: &mut Connection, ledger: &str) -> Result<usize> {
    let aggregator = Aggregator::new(load_config(conn)?)?;
    let mut dropped = 0;
    db::with_ledger(conn, ledger, |state| {
        dropped = state.records().len();
        Ok(aggregator.clear())
    })?;
    info!(ledger, dropped, "cleared ledger");
    Ok(dropped)
}

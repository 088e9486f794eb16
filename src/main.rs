// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use teamledger::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let ledger = matches.get_one::<String>("ledger").unwrap().trim().to_string();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("record", sub)) => commands::record::handle(&mut conn, &ledger, sub)?,
        Some(("status", sub)) => commands::status::handle(&conn, &ledger, sub)?,
        Some(("groups", sub)) => commands::groups::handle(&conn, &ledger, sub)?,
        Some(("history", sub)) => commands::history::handle(&conn, &ledger, sub)?,
        Some(("clear", sub)) => commands::clear::handle(&mut conn, &ledger, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, &ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &ledger, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &ledger)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

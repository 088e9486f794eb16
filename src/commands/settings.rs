// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{SETTING_KEYS, config_value, load_config, pretty_table, update_config};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let cfg = load_config(conn)?;
            let mut rows: Vec<Vec<String>> = SETTING_KEYS
                .iter()
                .map(|k| vec![k.to_string(), config_value(&cfg, k)])
                .collect();
            rows.push(vec!["net_rate".into(), cfg.net_rate().normalize().to_string()]);
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            let cfg = update_config(conn, key, value)?;
            println!("Set {} = {}", key, config_value(&cfg, key));
        }
        _ => {}
    }
    Ok(())
}

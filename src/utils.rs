// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::LedgerConfig;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::sync::Once;

pub const SETTING_KEYS: &[&str] = &["groups", "commission_rate", "deduction_rate", "separators"];

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once. `RUST_LOG` overrides the default
/// `teamledger=warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("teamledger=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Ledger configuration from the `settings` table, defaults for missing keys.
/// Fails if the stored combination is not a usable configuration.
pub fn load_config(conn: &Connection) -> Result<LedgerConfig> {
    let mut cfg = LedgerConfig::default();
    for key in SETTING_KEYS {
        if let Some(v) = get_setting(conn, key)? {
            apply_setting(&mut cfg, key, &v)?;
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Validates `value` against the rest of the current configuration before
/// storing it.
pub fn update_config(conn: &Connection, key: &str, value: &str) -> Result<LedgerConfig> {
    let mut cfg = load_config(conn)?;
    let value = value.trim();
    apply_setting(&mut cfg, key, value)?;
    cfg.validate()?;
    set_setting(conn, key, value)?;
    Ok(cfg)
}

fn apply_setting(cfg: &mut LedgerConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "groups" => {
            cfg.groups = value
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
        }
        "commission_rate" => cfg.commission_rate = parse_decimal(value.trim())?,
        "deduction_rate" => cfg.deduction_rate = parse_decimal(value.trim())?,
        "separators" => cfg.separators = value.chars().filter(|c| !c.is_whitespace()).collect(),
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (expected one of: {})",
                other,
                SETTING_KEYS.join(", ")
            ));
        }
    }
    Ok(())
}

pub fn config_value(cfg: &LedgerConfig, key: &str) -> String {
    match key {
        "groups" => cfg.groups.join(","),
        "commission_rate" => cfg.commission_rate.to_string(),
        "deduction_rate" => cfg.deduction_rate.to_string(),
        "separators" => cfg.separators.iter().collect(),
        _ => String::new(),
    }
}

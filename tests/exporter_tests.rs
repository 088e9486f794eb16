// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use teamledger::commands::{exporter, record};
use teamledger::{cli, db};
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    record::record_message(&mut conn, "default", "组1+1000+张三").unwrap();
    record::record_message(&mut conn, "default", "组2-500+李四, 王五").unwrap();
    conn
}

#[test]
fn exports_csv_records() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let out_str = out.to_str().unwrap();

    let matches = cli::build_cli().get_matches_from([
        "teamledger",
        "export",
        "--format",
        "CSV",
        "--out",
        out_str,
    ]);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("export command not parsed");
    };
    exporter::handle(&conn, "default", sub).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["time", "group", "type", "amount", "operator", "commission", "net"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "组1");
    assert_eq!(&rows[0][2], "credit");
    assert_eq!(&rows[0][5], "10.00");
    assert_eq!(&rows[1][2], "debit");
    assert_eq!(&rows[1][4], "李四, 王五");
    assert_eq!(&rows[1][6], "-4.75");
}

#[test]
fn exports_json_snapshot() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("data.json");
    exporter::export(&conn, "default", "json", out.to_str().unwrap()).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["records"].as_array().unwrap().len(), 2);
    assert_eq!(v["total_commission"], "5.00");
    assert_eq!(v["net_salary"], "4.75");
}

#[test]
fn unknown_format_is_an_error() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.xml");
    let err = exporter::export(&conn, "default", "xml", out.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

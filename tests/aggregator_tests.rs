// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use teamledger::aggregator::round_money;
use teamledger::{
    Aggregator, Direction, LedgerConfig, LedgerError, LedgerState, Parser, Transaction,
};

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn txn(group: &str, direction: Direction, amount: Decimal) -> Transaction {
    Transaction {
        group: group.into(),
        direction,
        amount,
        operator: "op".into(),
        timestamp: at(),
    }
}

fn money(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn agg() -> Aggregator {
    Aggregator::new(LedgerConfig::default()).unwrap()
}

#[test]
fn credit_of_one_hundred() {
    let a = agg();
    let d = a.deltas(&txn("组1", Direction::Credit, money("100.00")));
    assert_eq!(d.income, money("100.00"));
    assert_eq!(d.commission, money("1.00"));
    assert_eq!(d.net, money("0.95"));
}

#[test]
fn debit_reverses_commission_but_not_income() {
    let a = agg();
    let d = a.deltas(&txn("组1", Direction::Debit, money("100.00")));
    assert_eq!(d.income, Decimal::ZERO);
    assert_eq!(d.commission, money("-1.00"));
    assert_eq!(d.net, money("-0.95"));

    let state = a.apply(LedgerState::empty(), txn("组1", Direction::Debit, money("100"))).unwrap();
    assert_eq!(state.total_income(), Decimal::ZERO);
    assert_eq!(state.records()[0].commission, money("-1.00"));
    assert_eq!(state.records()[0].net, money("-0.95"));
}

#[test]
fn end_to_end_credit_then_debit() {
    let cfg = LedgerConfig::default();
    let p = Parser::new(&cfg).unwrap();
    let a = Aggregator::new(cfg).unwrap();

    let t1 = p.parse_at("组1+1000+张三", at()).unwrap();
    let s1 = a.apply(LedgerState::empty(), t1).unwrap();
    assert_eq!(format!("{:.2}", s1.total_commission()), "10.00");
    assert_eq!(format!("{:.2}", s1.net_payout()), "9.50");
    assert_eq!(format!("{:.2}", s1.total_income()), "1000.00");

    let t2 = p.parse_at("组2-500+李四", at()).unwrap();
    assert_eq!(t2.direction, Direction::Debit);
    let s2 = a.apply(s1, t2).unwrap();
    assert_eq!(format!("{:.2}", s2.total_commission()), "5.00");
    assert_eq!(format!("{:.2}", s2.net_payout()), "4.75");
    // Debits leave the global income total alone.
    assert_eq!(format!("{:.2}", s2.total_income()), "1000.00");
    assert_eq!(s2.records().len(), 2);
    assert_eq!(s2.records()[1].txn.operator, "李四");
}

#[test]
fn apply_is_deterministic() {
    let a = agg();
    let base = a.apply(LedgerState::empty(), txn("组1", Direction::Credit, money("12.34"))).unwrap();
    let t = txn("组2", Direction::Debit, money("7.77"));
    assert_eq!(a.apply(base.clone(), t.clone()), a.apply(base, t));
}

#[test]
fn deltas_are_rounded_before_folding() {
    let a = agg();
    let mut state = LedgerState::empty();
    for _ in 0..3 {
        state = a.apply(state, txn("组1", Direction::Credit, money("33.33"))).unwrap();
    }
    // 0.3333 -> 0.33 each; rounding the raw sum once would give 1.00.
    assert_eq!(state.total_commission(), money("0.99"));
    // 0.316635 -> 0.32 each.
    assert_eq!(state.net_payout(), money("0.96"));

    let summed: Decimal = state.records().iter().map(|r| r.commission).sum();
    assert_eq!(state.total_commission(), round_money(summed));
    let summed_net: Decimal = state.records().iter().map(|r| r.net).sum();
    assert_eq!(state.net_payout(), round_money(summed_net));
}

#[test]
fn rounding_is_half_to_even() {
    assert_eq!(round_money(money("0.005")), money("0.00"));
    assert_eq!(round_money(money("0.015")), money("0.02"));
    assert_eq!(round_money(money("0.025")), money("0.02"));
    assert_eq!(round_money(money("-0.015")), money("-0.02"));
}

#[test]
fn custom_rates() {
    let cfg = LedgerConfig {
        commission_rate: money("0.02"),
        deduction_rate: money("0.10"),
        ..LedgerConfig::default()
    };
    assert_eq!(cfg.net_rate(), money("0.018"));
    let a = Aggregator::new(cfg).unwrap();
    let d = a.deltas(&txn("组1", Direction::Credit, money("250")));
    assert_eq!(d.commission, money("5.00"));
    assert_eq!(d.net, money("4.50"));
}

#[test]
fn breakdown_subtracts_debits_per_group() {
    let a = agg();
    let mut s = LedgerState::empty();
    s = a.apply(s, txn("组1", Direction::Credit, money("1000"))).unwrap();
    s = a.apply(s, txn("组2", Direction::Debit, money("500"))).unwrap();
    s = a.apply(s, txn("组1", Direction::Credit, money("200"))).unwrap();
    s = a.apply(s, txn("组1", Direction::Debit, money("50"))).unwrap();

    let rows = a.breakdown(&s).unwrap();
    let groups: Vec<&str> = rows.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(groups, vec!["组1", "组2", "组3", "组4"]);

    assert_eq!(rows[0].records, 3);
    assert_eq!(rows[0].income, money("1150"));
    assert_eq!(rows[0].commission, money("11.50"));
    assert_eq!(rows[0].net, money("10.92"));

    assert_eq!(rows[1].records, 1);
    assert_eq!(rows[1].income, money("-500"));
    assert_eq!(rows[1].commission, money("-5.00"));
    assert_eq!(rows[1].net, money("-4.75"));

    assert_eq!(rows[2].records, 0);
    assert_eq!(rows[2].income, Decimal::ZERO);

    // The global total ignores both debits.
    assert_eq!(s.total_income(), money("1200"));
}

#[test]
fn breakdown_keeps_groups_no_longer_configured() {
    let old = Aggregator::new(LedgerConfig {
        groups: vec!["A".into(), "B".into()],
        ..LedgerConfig::default()
    })
    .unwrap();
    let s = old.apply(LedgerState::empty(), txn("B", Direction::Credit, money("10"))).unwrap();

    let new = Aggregator::new(LedgerConfig {
        groups: vec!["A".into()],
        ..LedgerConfig::default()
    })
    .unwrap();
    let rows = new.breakdown(&s).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].group, "B");
    assert_eq!(rows[1].income, money("10"));
}

#[test]
fn clear_returns_empty_state() {
    let a = agg();
    let s = a.apply(LedgerState::empty(), txn("组1", Direction::Credit, money("10"))).unwrap();
    assert!(!s.is_empty());
    let cleared = a.clear();
    assert!(cleared.records().is_empty());
    assert_eq!(cleared.total_income(), Decimal::ZERO);
    assert_eq!(cleared.total_commission(), Decimal::ZERO);
    assert_eq!(cleared.net_payout(), Decimal::ZERO);
    assert_eq!(cleared, LedgerState::empty());
}

#[test]
fn replay_reproduces_totals() {
    let a = agg();
    let mut s = LedgerState::empty();
    for (dir, amt) in [
        (Direction::Credit, "1000"),
        (Direction::Debit, "500"),
        (Direction::Credit, "33.33"),
        (Direction::Credit, "0.5"),
    ] {
        s = a.apply(s, txn("组3", dir, money(amt))).unwrap();
    }
    assert_eq!(Aggregator::replay(s.records()).unwrap(), s);
}

#[test]
fn invalid_rates_are_rejected() {
    let cfg = LedgerConfig {
        commission_rate: money("1.5"),
        ..LedgerConfig::default()
    };
    assert!(Aggregator::new(cfg).is_err());
}

const MAX: &str = "79228162514264337593543950335";

#[test]
fn totals_out_of_range_fail_without_panicking() {
    let cfg = LedgerConfig::default();
    let p = Parser::new(&cfg).unwrap();
    let a = Aggregator::new(cfg).unwrap();
    let text = format!("组1+{}+x", MAX);

    let s1 = a.apply(LedgerState::empty(), p.parse_at(&text, at()).unwrap()).unwrap();
    assert_eq!(s1.total_income(), money(MAX));
    let err = a
        .apply(s1.clone(), p.parse_at(&text, at()).unwrap())
        .unwrap_err();
    assert_eq!(err, LedgerError::Overflow("total income".into()));

    let mut records = s1.records().to_vec();
    records.extend(s1.records().iter().cloned());
    assert!(Aggregator::replay(&records).is_err());
}

#[test]
fn breakdown_out_of_range_is_an_error() {
    let a = agg();
    let mut s = LedgerState::empty();
    for _ in 0..2 {
        s = a.apply(s, txn("组1", Direction::Debit, money(MAX))).unwrap();
    }
    // Debits never reach total income, only the group's.
    assert_eq!(s.total_income(), Decimal::ZERO);
    assert_eq!(
        a.breakdown(&s).unwrap_err(),
        LedgerError::Overflow("group income".into())
    );
}

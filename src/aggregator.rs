// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Folds transactions into a [`LedgerState`].
//!
//! Accounting rule, per transaction:
//!
//! | direction | income    | commission         | net            |
//! |-----------|-----------|--------------------|----------------|
//! | credit    | +amount   | +amount * rate     | +amount * net  |
//! | debit     | unchanged | -amount * rate     | -amount * net  |
//!
//! Deltas are rounded to cents when computed and stored on the record; the
//! totals are the rounded running sum of those stored deltas. Sums that leave
//! the `Decimal` range fail with [`LedgerError::Overflow`] instead of
//! wrapping or panicking.
//!
//! Debits do not move the global `total_income`, yet the per-group breakdown
//! subtracts them from the group's income. Both figures are kept as they are;
//! `doctor` points the difference out whenever debits exist.

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::models::{Direction, GroupSummary, LedgerState, Record, Transaction};
use rust_decimal::Decimal;
use tracing::debug;

/// Money is kept to cents, midpoint to even.
pub fn round_money(d: Decimal) -> Decimal {
    d.round_dp(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deltas {
    pub income: Decimal,
    pub commission: Decimal,
    pub net: Decimal,
}

pub struct Aggregator {
    config: LedgerConfig,
}

impl Aggregator {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn deltas(&self, txn: &Transaction) -> Deltas {
        let commission = round_money(txn.amount * self.config.commission_rate);
        let net = round_money(txn.amount * self.config.net_rate());
        match txn.direction {
            Direction::Credit => Deltas {
                income: txn.amount,
                commission,
                net,
            },
            Direction::Debit => Deltas {
                income: Decimal::ZERO,
                commission: -commission,
                net: -net,
            },
        }
    }

    pub fn apply(&self, state: LedgerState, txn: Transaction) -> Result<LedgerState, LedgerError> {
        let d = self.deltas(&txn);
        debug!(group = %txn.group, direction = %txn.direction, commission = %d.commission, net = %d.net, "applying transaction");
        let record = Record {
            txn,
            commission: d.commission,
            net: d.net,
        };
        fold(state, record, d.income)
    }

    /// The canonical empty ledger.
    pub fn clear(&self) -> LedgerState {
        LedgerState::empty()
    }

    /// Rebuilds totals from stored records alone, reusing each record's
    /// stored deltas instead of recomputing them at today's rates.
    pub fn replay(records: &[Record]) -> Result<LedgerState, LedgerError> {
        records.iter().cloned().try_fold(LedgerState::empty(), |state, r| {
            let income = match r.txn.direction {
                Direction::Credit => r.txn.amount,
                Direction::Debit => Decimal::ZERO,
            };
            fold(state, r, income)
        })
    }

    /// Per-group income, commission and net, in configured order. Groups
    /// that only appear in history (e.g. since removed from the config) are
    /// listed after, in order of first appearance.
    pub fn breakdown(&self, state: &LedgerState) -> Result<Vec<GroupSummary>, LedgerError> {
        let mut out: Vec<GroupSummary> = self
            .config
            .groups
            .iter()
            .map(|g| GroupSummary {
                group: g.clone(),
                records: 0,
                income: Decimal::ZERO,
                commission: Decimal::ZERO,
                net: Decimal::ZERO,
            })
            .collect();
        for r in state.records() {
            let idx = match out.iter().position(|s| s.group == r.txn.group) {
                Some(i) => i,
                None => {
                    out.push(GroupSummary {
                        group: r.txn.group.clone(),
                        records: 0,
                        income: Decimal::ZERO,
                        commission: Decimal::ZERO,
                        net: Decimal::ZERO,
                    });
                    out.len() - 1
                }
            };
            let s = &mut out[idx];
            s.records += 1;
            s.income = add(s.income, r.group_income_delta(), "group income")?;
            s.commission = add(s.commission, r.commission, "group commission")?;
            s.net = add(s.net, r.net, "group net")?;
        }
        for s in &mut out {
            s.income = round_money(s.income);
            s.commission = round_money(s.commission);
            s.net = round_money(s.net);
        }
        Ok(out)
    }
}

// The state is only touched once every total has been computed.
fn fold(
    mut state: LedgerState,
    record: Record,
    income: Decimal,
) -> Result<LedgerState, LedgerError> {
    let total_income = add(state.total_income, income, "total income")?;
    let total_commission = add(state.total_commission, record.commission, "total commission")?;
    let net_payout = add(state.net_payout, record.net, "net payout")?;
    state.total_income = round_money(total_income);
    state.total_commission = round_money(total_commission);
    state.net_payout = round_money(net_payout);
    state.records.push(record);
    Ok(state)
}

fn add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, LedgerError> {
    a.checked_add(b)
        .ok_or_else(|| LedgerError::Overflow(what.to_string()))
}

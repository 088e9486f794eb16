// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Credit,
    #[serde(rename = "-")]
    Debit,
}

impl Direction {
    pub fn from_sign(c: char) -> Option<Self> {
        match c {
            '+' => Some(Direction::Credit),
            '-' => Some(Direction::Debit),
            _ => None,
        }
    }

    pub fn sign(&self) -> char {
        match self {
            Direction::Credit => '+',
            Direction::Debit => '-',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed cash movement. `amount` is always a magnitude; the sign lives in
/// `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub group: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    #[serde(deserialize_with = "magnitude")]
    pub amount: Decimal,
    pub operator: String,
    #[serde(rename = "time", with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

/// A transaction as it sits in the ledger history, carrying the rounded
/// commission and net deltas computed when it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub txn: Transaction,
    #[serde(rename = "this_commission")]
    pub commission: Decimal,
    #[serde(rename = "this_net_salary")]
    pub net: Decimal,
}

impl Record {
    /// Contribution of this record to its group's income. Debits subtract
    /// here even though they leave the global income total untouched.
    pub fn group_income_delta(&self) -> Decimal {
        match self.txn.direction {
            Direction::Credit => self.txn.amount,
            Direction::Debit => -self.txn.amount,
        }
    }
}

/// The whole ledger: append-only history plus running totals.
///
/// Only `Aggregator::apply` and `Aggregator::clear` produce new states, so the
/// totals always reflect the stored deltas of `records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub(crate) records: Vec<Record>,
    #[serde(default)]
    pub(crate) total_income: Decimal,
    #[serde(default)]
    pub(crate) total_commission: Decimal,
    #[serde(rename = "net_salary", alias = "net_payout", default)]
    pub(crate) net_payout: Decimal,
}

impl LedgerState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuilds a state exactly as persisted. Stores use this; nothing is
    /// recomputed.
    pub fn from_parts(
        records: Vec<Record>,
        total_income: Decimal,
        total_commission: Decimal,
        net_payout: Decimal,
    ) -> Self {
        Self {
            records,
            total_income,
            total_commission,
            net_payout,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn total_commission(&self) -> Decimal {
        self.total_commission
    }

    pub fn net_payout(&self) -> Decimal {
        self.net_payout
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-group figures derived from the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub records: usize,
    pub income: Decimal,
    pub commission: Decimal,
    pub net: Decimal,
}

// Older snapshots stored debits as negative amounts.
fn magnitude<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer).map(|d| d.abs())
}

mod timestamp {
    use super::TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

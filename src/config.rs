// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Characters that already mean something inside a message and therefore
/// cannot double as the multi-amount separator.
const RESERVED_SEPARATORS: &[char] = &['+', '-', '.'];

/// Everything the parser and aggregator need to know about a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Valid group tokens, matched exactly.
    pub groups: Vec<String>,
    /// Fraction of a credited amount recognized as commission.
    pub commission_rate: Decimal,
    /// Fraction of the commission withheld before payout.
    pub deduction_rate: Decimal,
    /// Separators accepted by the multi-amount grammar (`组1/100+200/张三`).
    pub separators: Vec<char>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            groups: ["组1", "组2", "组3", "组4"]
                .iter()
                .map(|g| g.to_string())
                .collect(),
            commission_rate: Decimal::new(1, 2),
            deduction_rate: Decimal::new(5, 2),
            separators: vec!['/'],
        }
    }
}

impl LedgerConfig {
    /// commission_rate * (1 - deduction_rate)
    pub fn net_rate(&self) -> Decimal {
        self.commission_rate * (Decimal::ONE - self.deduction_rate)
    }

    pub fn is_valid_group(&self, token: &str) -> bool {
        self.groups.iter().any(|g| g == token)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.groups.is_empty() {
            return Err(invalid("group set is empty"));
        }
        let mut seen = HashSet::new();
        for g in &self.groups {
            if g.is_empty() {
                return Err(invalid("group token is blank"));
            }
            if g.chars().any(char::is_whitespace) {
                return Err(invalid(format!("group token '{}' contains whitespace", g)));
            }
            if !seen.insert(g.as_str()) {
                return Err(invalid(format!("group token '{}' is listed twice", g)));
            }
        }
        check_rate("commission_rate", self.commission_rate)?;
        check_rate("deduction_rate", self.deduction_rate)?;
        if self.separators.is_empty() {
            return Err(invalid("no multi-amount separator configured"));
        }
        for sep in &self.separators {
            if sep.is_ascii_digit() || sep.is_whitespace() || RESERVED_SEPARATORS.contains(sep) {
                return Err(invalid(format!("'{}' cannot be used as a separator", sep)));
            }
        }
        Ok(())
    }
}

fn check_rate(name: &str, rate: Decimal) -> Result<(), LedgerError> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(invalid(format!("{} {} is outside [0, 1)", name, rate)));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> LedgerError {
    LedgerError::InvalidConfiguration(msg.into())
}

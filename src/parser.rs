// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns one line of chat text into a [`Transaction`].
//!
//! Two grammars are recognized and tried in [`Grammar::ORDER`]:
//!
//! * `组1/100+250.5/张三`: several plus-joined amounts between two identical
//!   separators, always a credit for the sum;
//! * `组1+1000+张三` / `组2-500+李四`: one signed amount, then `+`, then the
//!   operator.
//!
//! Anything else is a [`ParseFailure`].

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::models::{Direction, Transaction};
use chrono::{Local, NaiveDateTime, Timelike};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

// ASCII digits only; `\d` would also accept full-width digits.
const AMOUNT: &str = r"[0-9]+(?:\.[0-9]*)?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    MultiAmount,
    SignedAmount,
}

impl Grammar {
    /// Evaluation order. The multi-amount form goes first so that a message
    /// using a configured separator is never read as a signed one.
    pub const ORDER: [Grammar; 2] = [Grammar::MultiAmount, Grammar::SignedAmount];
}

/// The text matched no grammar. Expected outcome, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("format not recognized: '{text}'")]
pub struct ParseFailure {
    pub text: String,
}

pub struct Parser {
    multi: Vec<Regex>,
    signed: Regex,
    usage: String,
}

impl Parser {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;

        let mut tokens: Vec<&str> = config.groups.iter().map(String::as_str).collect();
        // Longest first so `组10` is never shadowed by `组1`.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()));
        let groups = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        let multi = config
            .separators
            .iter()
            .map(|sep| {
                let s = regex::escape(&sep.to_string());
                build(&format!(
                    r"^(?P<group>{groups}){s}(?P<amounts>{AMOUNT}(?:\+{AMOUNT})*){s}(?P<operator>.+)$"
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let signed = build(&format!(
            r"^(?P<group>{groups})(?P<sign>[+-])(?P<amount>{AMOUNT})\+(?P<operator>.+)$"
        ))?;

        let g = &config.groups[0];
        let s = config.separators[0];
        let usage = format!(
            "{g}+1000+name (income), {g}-500+name (expense), {g}{s}100+200{s}name (several incomes)"
        );

        Ok(Self {
            multi,
            signed,
            usage,
        })
    }

    /// Accepted message shapes, spelled with the configured tokens.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn parse(&self, text: &str) -> Result<Transaction, ParseFailure> {
        self.parse_at(text, Local::now().naive_local())
    }

    /// Same as [`Parser::parse`] with an explicit recording time.
    pub fn parse_at(&self, text: &str, when: NaiveDateTime) -> Result<Transaction, ParseFailure> {
        let line = text.trim();
        for grammar in Grammar::ORDER {
            if let Some(txn) = self.parse_with(grammar, line, when) {
                debug!(?grammar, group = %txn.group, amount = %txn.amount, "parsed ledger message");
                return Ok(txn);
            }
        }
        Err(ParseFailure {
            text: line.to_string(),
        })
    }

    /// Evaluates a single grammar against an already trimmed line.
    pub fn parse_with(
        &self,
        grammar: Grammar,
        line: &str,
        when: NaiveDateTime,
    ) -> Option<Transaction> {
        let when = when.with_nanosecond(0).unwrap_or(when);
        match grammar {
            Grammar::MultiAmount => self.multi.iter().find_map(|re| {
                let caps = re.captures(line)?;
                let mut total = Decimal::ZERO;
                for part in caps["amounts"].split('+') {
                    total = total.checked_add(parse_magnitude(part)?)?;
                }
                Some(transaction(&caps, Direction::Credit, total, when))
            }),
            Grammar::SignedAmount => {
                let caps = self.signed.captures(line)?;
                let direction = Direction::from_sign(caps["sign"].chars().next()?)?;
                let amount = parse_magnitude(&caps["amount"])?;
                Some(transaction(&caps, direction, amount, when))
            }
        }
    }
}

fn transaction(
    caps: &Captures<'_>,
    direction: Direction,
    amount: Decimal,
    timestamp: NaiveDateTime,
) -> Transaction {
    Transaction {
        group: caps["group"].to_string(),
        direction,
        amount,
        operator: caps["operator"].to_string(),
        timestamp,
    }
}

/// `None` when the digits do not fit a `Decimal`.
fn parse_magnitude(s: &str) -> Option<Decimal> {
    s.strip_suffix('.').unwrap_or(s).parse::<Decimal>().ok()
}

fn build(pattern: &str) -> Result<Regex, LedgerError> {
    Regex::new(pattern).map_err(|e| LedgerError::InvalidConfiguration(e.to_string()))
}

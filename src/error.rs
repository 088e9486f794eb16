// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the ledger core itself. Parse failures are a separate
/// type (`parser::ParseFailure`) because they are an expected outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Amount overflow: {0} is out of range")]
    Overflow(String),
}

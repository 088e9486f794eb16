// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod parser;
pub mod store;
pub mod utils;

pub use aggregator::Aggregator;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use models::{Direction, GroupSummary, LedgerState, Record, Transaction};
pub use parser::{Grammar, ParseFailure, Parser};
pub use store::{JsonFileStore, SnapshotStore, SqliteStore};

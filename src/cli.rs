// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("teamledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Shared team ledger: chat-style entries in, commission and net payout out")
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .global(true)
                .default_value("default")
                .help("Ledger identifier"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("record")
                .about("Record one message, e.g. '组1+1000+张三'")
                .arg(Arg::new("text").required(true).help("Ledger message")),
        )
        .subcommand(json_flags(
            Command::new("status").about("Total income, commission and net payout"),
        ))
        .subcommand(json_flags(
            Command::new("groups").about("Per-group income, commission and net payout"),
        ))
        .subcommand(json_flags(
            Command::new("history")
                .about("List recorded transactions, newest first")
                .arg(Arg::new("group").long("group").help("Only this group"))
                .arg(
                    Arg::new("since")
                        .long("since")
                        .help("Only on or after this date (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("clear")
                .about("Erase every record of the ledger")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the wipe"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import")
                .subcommand(
                    Command::new("lines")
                        .about("Record every message of a text file, one per line")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("skip_invalid")
                                .long("skip-invalid")
                                .action(ArgAction::SetTrue)
                                .help("Report unrecognized lines instead of aborting"),
                        ),
                )
                .subcommand(
                    Command::new("snapshot")
                        .about("Replace the ledger with a JSON snapshot")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records as CSV or the full ledger as a JSON snapshot")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("config")
                .about("Groups, rates and separators")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, Command, arg, command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(
            arg!(--jsonl "Print one JSON object per line")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--status <STATUS> "all | upcoming | ongoing | listed")
            .required(false)
            .default_value("all"),
    )
    .arg(arg!(--search <TEXT> "Case-insensitive match on company name or sector").required(false))
}

/// Fields shared by `ipo add` and `ipo update`. On add the core fields are required.
fn ipo_field_args(cmd: Command, adding: bool) -> Command {
    cmd.arg(
        Arg::new("company")
            .long("company")
            .value_name("NAME")
            .required(adding),
    )
    .arg(Arg::new("sector").long("sector").required(adding))
    .arg(
        Arg::new("price_band")
            .long("price-band")
            .value_name("MIN-MAX")
            .required(adding),
    )
    .arg(
        Arg::new("open")
            .long("open")
            .value_name("YYYY-MM-DD")
            .required(adding),
    )
    .arg(
        Arg::new("close")
            .long("close")
            .value_name("YYYY-MM-DD")
            .required(adding),
    )
    .arg(
        Arg::new("issue_size")
            .long("issue-size")
            .value_name("CRORE")
            .required(adding),
    )
    .arg(
        Arg::new("issue_type")
            .long("issue-type")
            .value_name("Main Board|SME|Debt")
            .required(adding),
    )
    .arg(
        Arg::new("lot_size")
            .long("lot-size")
            .value_parser(RangedU64ValueParser::<u32>::new().range(1..)),
    )
    .arg(
        Arg::new("status")
            .long("status")
            .value_name("upcoming|ongoing|listed"),
    )
    .arg(
        Arg::new("listing_date")
            .long("listing-date")
            .value_name("YYYY-MM-DD"),
    )
    .arg(Arg::new("ipo_price").long("ipo-price"))
    .arg(Arg::new("listing_price").long("listing-price"))
    .arg(Arg::new("cmp").long("cmp").help("Current market price"))
    .arg(
        Arg::new("listing_gain")
            .long("listing-gain")
            .value_name("PCT"),
    )
    .arg(
        Arg::new("current_return")
            .long("current-return")
            .value_name("PCT"),
    )
    .arg(Arg::new("rhp").long("rhp").value_name("URI"))
    .arg(Arg::new("drhp").long("drhp").value_name("URI"))
}

pub fn build_cli() -> Command {
    command!()
        .name("ipodesk")
        .about("IPO listing dashboard: register, browse, subscribe and track allotments")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(Command::new("sample").about("Load the sample IPO data set"))
        .subcommand(
            Command::new("ipo")
                .about("Register and browse IPOs")
                .subcommand(ipo_field_args(
                    Command::new("add")
                        .about("Register a new IPO")
                        .arg(arg!(--id <ID> "Explicit id (default: next free number)").required(false)),
                    true,
                ))
                .subcommand(ipo_field_args(
                    Command::new("update")
                        .about("Update fields of an existing IPO")
                        .arg(arg!(--id <ID>).required(true)),
                    false,
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an IPO")
                        .arg(arg!(--id <ID>).required(true)),
                )
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one IPO")
                        .arg(arg!(--id <ID>).required(true)),
                ))
                .subcommand(json_flags(filter_args(
                    Command::new("list")
                        .about("List IPOs, filtered and paginated")
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("page_size")
                                .long("page-size")
                                .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
                        ),
                ))),
        )
        .subcommand(json_flags(
            Command::new("stats").about("Counts per status and average current return"),
        ))
        .subcommand(
            Command::new("subscribe")
                .about("Browse open issues and apply")
                .subcommand(json_flags(
                    Command::new("list").about("IPOs with their subscription state"),
                ))
                .subcommand(
                    Command::new("apply")
                        .about("Apply for shares in an ongoing IPO")
                        .arg(arg!(--ipo <ID>).required(true))
                        .arg(
                            Arg::new("application")
                                .long("application")
                                .value_name("APP#########")
                                .required(true),
                        )
                        .arg(arg!(--pan <PAN>).required(true))
                        .arg(
                            Arg::new("shares")
                                .long("shares")
                                .required(true)
                                .value_parser(RangedU64ValueParser::<u32>::new().range(1..)),
                        )
                        .arg(arg!(--bid <PRICE>).required(true))
                        .arg(arg!(--date <DATE> "Application date (default: today)").required(false)),
                ),
        )
        .subcommand(
            Command::new("allotment")
                .about("Check and record allotment status")
                .subcommand(json_flags(
                    Command::new("list").about("Applications with allotment status").arg(
                        arg!(--search <TEXT> "Match on company name or application number")
                            .required(false),
                    ),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Record the allotted share count")
                        .arg(Arg::new("application").long("application").required(true))
                        .arg(
                            Arg::new("allotted")
                                .long("allotted")
                                .required(true)
                                .value_parser(RangedU64ValueParser::<u32>::new()),
                        ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("ipos")
                        .about("Import IPOs from CSV")
                        .arg(arg!(--path <FILE>).required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(filter_args(
                    Command::new("ipos")
                        .about("Export IPOs to CSV or JSON")
                        .arg(arg!(--format <FORMAT> "csv | json").required(true))
                        .arg(arg!(--out <FILE>).required(true)),
                )),
        )
        .subcommand(
            Command::new("config")
                .about("Stored settings")
                .subcommand(
                    Command::new("set-page-size").arg(
                        Arg::new("size")
                            .required(true)
                            .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
                    ),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(Command::new("doctor").about("Check stored IPOs for data-entry problems"))
}

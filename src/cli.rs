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
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("Transaction id (see `tx list`)")
}

fn index_arg() -> Arg {
    Arg::new("index")
        .long("index")
        .required(true)
        .help("Zero-based line item index")
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
        .arg(Arg::new("store").long("store"))
        .arg(Arg::new("amount").long("amount"))
        .arg(Arg::new("category").long("category"))
        .arg(
            Arg::new("type")
                .long("type")
                .help("expense|income"),
        )
}

pub fn build_cli() -> Command {
    Command::new("spendsmart")
        .about("Scan receipts, track budgets, and get AI spending advice")
        .version(clap::crate_version!())
        .arg(
            Arg::new("home")
                .long("home")
                .global(true)
                .env("SPENDSMART_HOME")
                .help("Data directory (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("api_key")
                .long("api-key")
                .global(true)
                .help("Gemini API key (falls back to API_KEY, then GEMINI_API_KEY)"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .global(true)
                .env("SPENDSMART_MODEL")
                .help("Gemini model name"),
        )
        .arg(
            Arg::new("api_base")
                .long("api-base")
                .global(true)
                .env("SPENDSMART_API_BASE")
                .help("Base URL of the Gemini REST API"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("AI request timeout in seconds"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Log verbosity; RUST_LOG overrides"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in (local, no password)")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required_unless_present("google"),
                )
                .arg(Arg::new("name").long("name"))
                .arg(
                    Arg::new("google")
                        .long("google")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["email", "name"])
                        .help("Use the demo Google account"),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("theme")
                .about("Light/dark preference")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("toggle"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("theme")
                            .long("theme")
                            .required(true)
                            .value_parser(["light", "dark"]),
                    ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Spending categories")
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    tx_fields(Command::new("add"))
                        .mut_arg("store", |a| a.required(true))
                        .mut_arg("amount", |a| a.required(true))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("store").long("store"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(Command::new("show").arg(id_arg())))
                .subcommand(
                    tx_fields(Command::new("edit").arg(id_arg())).arg(
                        Arg::new("recurring")
                            .long("recurring")
                            .value_parser(value_parser!(bool)),
                    ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("item-add")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("quantity").long("quantity"))
                        .arg(Arg::new("price").long("price").help("Unit price"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(
                    Command::new("item-set")
                        .arg(id_arg())
                        .arg(index_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("quantity").long("quantity"))
                        .arg(Arg::new("price").long("price").help("Unit price"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("item-rm").arg(id_arg()).arg(index_arg()))
                .subcommand(
                    Command::new("recalc")
                        .about("Set the total to the sum of line items")
                        .arg(id_arg()),
                ),
        )
        .subcommand(json_flags(
            Command::new("scan")
                .about("Extract transactions from a receipt or statement")
                .arg(Arg::new("path").long("path").required(true))
                .arg(
                    Arg::new("mime")
                        .long("mime")
                        .help("MIME type; guessed from the extension if omitted"),
                )
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .help("Save every extracted transaction"),
                ),
        ))
        .subcommand(
            Command::new("budget")
                .about("Category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(Arg::new("category").long("category").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Spending reports")
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(json_flags(Command::new("by-category")))
                .subcommand(json_flags(Command::new("by-store")))
                .subcommand(json_flags(
                    Command::new("history")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("as_of").long("as-of").help("YYYY-MM-DD")),
                ))
                .subcommand(json_flags(Command::new("recurring")))
                .subcommand(json_flags(Command::new("items"))),
        )
        .subcommand(
            Command::new("advise")
                .about("Ask the AI advisor about your spending")
                .arg(Arg::new("query").long("query").required(true))
                .arg(
                    Arg::new("web_search")
                        .long("web-search")
                        .action(ArgAction::SetTrue)
                        .help("Allow the advisor to cite web sources"),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("json")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use spendsmart::ai::GeminiClient;
use spendsmart::config::Config;
use spendsmart::state::Session;
use spendsmart::store::{SqliteStore, Store};
use spendsmart::{cli, commands, db, utils};

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    let level = matches
        .get_one::<String>("log_level")
        .map(String::as_str)
        .unwrap_or("warn");
    init_logger(level);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", utils::error_line(&e));
            tracing::debug!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let config = Config::from_matches(matches)?;
    let conn = db::open_or_init(&config.data_dir)?;
    let mut session = Session::load(Store::new(SqliteStore::new(conn)?));

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&mut session, sub)?,
        Some(("logout", _)) => commands::auth::logout(&mut session)?,
        Some(("whoami", _)) => commands::auth::whoami(&session)?,
        Some(("theme", sub)) => commands::theme::handle(&mut session, sub)?,
        Some(("category", sub)) => commands::categories::handle(sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut session, sub)?,
        Some(("scan", sub)) => {
            let client = GeminiClient::from_config(&config.ai)?;
            commands::scan::run(&mut session, client, sub, utils::today())?;
        }
        Some(("budget", sub)) => commands::budgets::handle(&mut session, sub)?,
        Some(("report", sub)) => commands::reports::handle(&session, sub)?,
        Some(("advise", sub)) => {
            let client = GeminiClient::from_config(&config.ai)?;
            commands::advisor::run(&session, client, sub)?;
        }
        Some(("export", sub)) => commands::exporter::handle(&session, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(session.state(), &config)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise only this crate logs, at `level`.
fn init_logger(level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, signed_in_session, tx};
use spendsmart::cli;
use spendsmart::commands::budgets;
use spendsmart::state::{Action, Session};
use spendsmart::store::{BUDGETS_KEY, KeyValueStore, SqliteStore};

fn run(session: &mut Session<SqliteStore>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli()
        .get_matches_from(std::iter::once("spendsmart").chain(args.iter().copied()));
    match matches.subcommand() {
        Some(("budget", sub)) => budgets::handle(session, sub),
        _ => panic!("no budget subcommand"),
    }
}

#[test]
fn set_twice_updates_single_budget() {
    let mut session = signed_in_session();
    run(&mut session, &["budget", "set", "--category", "Dining", "--limit", "50"]).unwrap();
    run(&mut session, &["budget", "set", "--category", "dining", "--limit", "80"]).unwrap();

    assert_eq!(session.state().budgets.len(), 1);
    assert_eq!(session.state().budgets[0].limit, dec("80"));

    let raw = session.store().backend().get(BUDGETS_KEY).unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["category"], "Dining");
    assert_eq!(v[0]["limit"], serde_json::json!(80.0));
}

#[test]
fn rows_show_progress_per_budget() {
    let mut session = signed_in_session();
    session.dispatch(Action::AddTransaction(tx("2025-08-10", "Chipotle", "45", "Dining"))).unwrap();
    session
        .dispatch(Action::AddTransaction(tx("2025-08-11", "Kroger", "30", "Groceries")))
        .unwrap();
    run(&mut session, &["budget", "set", "--category", "Dining", "--limit", "50"]).unwrap();
    run(&mut session, &["budget", "set", "--category", "Groceries", "--limit", "20"]).unwrap();

    let rows = budgets::rows(session.state());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].spent, "45.00");
    assert_eq!(rows[0].percentage, "90");
    assert_eq!(rows[0].status, "Nearing Limit");
    assert_eq!(rows[1].percentage, "100");
    assert_eq!(rows[1].status, "Exceeded");
}

#[test]
fn remove_missing_budget_is_an_error() {
    let mut session = signed_in_session();
    assert!(run(&mut session, &["budget", "rm", "--category", "Travel"]).is_err());
    assert!(run(&mut session, &["budget", "set", "--category", "Travel", "--limit", "x"]).is_err());
}

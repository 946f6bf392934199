// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, read_only_session, signed_in_session, tx};
use spendsmart::cli;
use spendsmart::commands::transactions;
use spendsmart::models::{Item, Source};
use spendsmart::state::{Action, Session};
use spendsmart::store::SqliteStore;

fn seeded() -> Session<SqliteStore> {
    let mut session = signed_in_session();
    for i in 1..=3 {
        session
            .dispatch(Action::AddTransaction(tx(
                &format!("2025-01-0{}", i),
                "Corner Shop",
                "10",
                "Groceries",
            )))
            .unwrap();
    }
    session
        .dispatch(Action::AddTransaction(tx(
            "2025-02-01",
            "Shell",
            "40",
            "Transport",
        )))
        .unwrap();
    session
}

fn run(session: &mut Session<SqliteStore>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli()
        .get_matches_from(std::iter::once("spendsmart").chain(args.iter().copied()));
    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(session, sub),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn list_limit_respected() {
    let session = seeded();
    let matches = cli::build_cli().get_matches_from(["spendsmart", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(session.state(), list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-02-01");
            assert_eq!(rows[1].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month_and_category() {
    let session = seeded();
    let matches = cli::build_cli().get_matches_from([
        "spendsmart",
        "tx",
        "list",
        "--month",
        "2025-01",
        "--category",
        "groceries",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(session.state(), list_m).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.category == "Groceries"));
}

#[test]
fn add_infers_category_from_store() {
    let mut session = signed_in_session();
    run(
        &mut session,
        &["tx", "add", "--store", "Netflix", "--amount", "15.99", "--recurring"],
    )
    .unwrap();
    let t = &session.state().transactions[0];
    assert_eq!(t.category, "Entertainment");
    assert!(t.is_recurring);
    assert_eq!(t.source, Source::Manual);
    assert_eq!(t.total_amount, dec("15.99"));
}

#[test]
fn add_fails_when_store_rejects_write() {
    let mut session = read_only_session();
    let matches = cli::build_cli().get_matches_from([
        "spendsmart",
        "tx",
        "add",
        "--store",
        "Kroger",
        "--amount",
        "12",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let err = transactions::handle(&mut session, tx_m).unwrap_err();
    let line = spendsmart::utils::error_line(&err);
    assert!(line.starts_with("Error: Failed to persist transactions: "));
    assert!(line.contains("readonly"));
    assert!(session.store().load_transactions().is_empty());
}

#[test]
fn add_rejects_bad_amount() {
    let mut session = signed_in_session();
    assert!(run(&mut session, &["tx", "add", "--store", "X", "--amount", "abc"]).is_err());
    assert!(session.state().transactions.is_empty());
}

#[test]
fn data_commands_require_sign_in() {
    let mut session = signed_in_session();
    session.dispatch(Action::Logout).unwrap();
    let err = run(&mut session, &["tx", "list"]).unwrap_err();
    assert!(err.to_string().contains("Not signed in"));
}

#[test]
fn items_edit_and_recalculate() {
    let mut session = signed_in_session();
    let mut t = tx("2025-03-01", "Kroger", "99", "Groceries");
    t.items.push(Item::new("Milk", dec("1"), dec("2.50")));
    let id = t.id.clone();
    session.dispatch(Action::AddTransaction(t)).unwrap();
    let prefix = &id[..8];

    run(
        &mut session,
        &["tx", "item-add", "--id", prefix, "--name", "Eggs", "--quantity", "2", "--price", "3"],
    )
    .unwrap();
    run(
        &mut session,
        &["tx", "item-set", "--id", &id, "--index", "0", "--quantity", "2"],
    )
    .unwrap();

    let t = session.state().transaction(&id).unwrap();
    assert_eq!(t.items.len(), 2);
    assert_eq!(t.items[0].total_price, dec("5"));
    assert_eq!(t.items[1].name, "Eggs");
    assert_eq!(t.items[1].total_price, dec("6"));
    assert_eq!(t.items[1].category.as_deref(), Some("Groceries"));
    assert_eq!(t.total_amount, dec("99"));

    run(&mut session, &["tx", "recalc", "--id", &id]).unwrap();
    assert_eq!(session.state().transaction(&id).unwrap().total_amount, dec("11"));

    run(&mut session, &["tx", "item-rm", "--id", &id, "--index", "0"]).unwrap();
    let t = session.state().transaction(&id).unwrap();
    assert_eq!(t.items.len(), 1);
    assert_eq!(t.total_amount, dec("11"));

    assert!(run(&mut session, &["tx", "item-rm", "--id", &id, "--index", "5"]).is_err());
}

#[test]
fn edit_and_remove_by_id() {
    let mut session = seeded();
    let id = session.state().transactions[3].id.clone();
    run(
        &mut session,
        &["tx", "edit", "--id", &id, "--category", "Utilities", "--recurring", "true"],
    )
    .unwrap();
    let t = session.state().transaction(&id).unwrap();
    assert_eq!(t.category, "Utilities");
    assert!(t.is_recurring);

    run(&mut session, &["tx", "rm", "--id", &id]).unwrap();
    assert!(session.state().transaction(&id).is_none());
    assert_eq!(session.state().transactions.len(), 3);
    assert!(run(&mut session, &["tx", "rm", "--id", &id]).is_err());
}

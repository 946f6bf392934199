// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{signed_in_session, tx};
use spendsmart::cli;
use spendsmart::commands::{doctor, exporter};
use spendsmart::config::{AiConfig, Config};
use spendsmart::models::Item;
use spendsmart::state::{Action, AppState};
use tempfile::tempdir;

fn export_args(fmt: &str, out: &str) -> clap::ArgMatches {
    cli::build_cli().get_matches_from([
        "spendsmart",
        "export",
        "transactions",
        "--format",
        fmt,
        "--out",
        out,
    ])
}

fn sample_session() -> spendsmart::state::Session<spendsmart::store::SqliteStore> {
    let mut session = signed_in_session();
    let mut t = tx("2025-01-02", "Corner Shop", "12.34", "Groceries");
    t.items.push(Item::new("Milk", 1.into(), "12.34".parse().unwrap()));
    session.dispatch(Action::AddTransaction(t)).unwrap();
    session
}

#[test]
fn export_transactions_pretty_json() {
    let session = sample_session();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = export_args("json", &out_str);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&session, export_m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(v[0]["store"], "Corner Shop");
    assert_eq!(v[0]["items"][0]["name"], "Milk");
    assert!(contents.contains("\n  "));
}

#[test]
fn export_transactions_csv() {
    let session = sample_session();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = export_args("CSV", &out_str);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&session, export_m).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    let rec = rdr.records().next().unwrap().unwrap();
    assert_eq!(&rec[2], "Corner Shop");
    assert_eq!(&rec[3], "12.34");
    assert_eq!(&rec[5], "EXPENSE");
    assert_eq!(&rec[8], "Milk x 1");
}

#[test]
fn unknown_export_format_fails() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.xml");
    let res = exporter::export_transactions(&[], "xml", &out);
    assert!(res.is_err());
    assert!(!out.exists());
}

#[test]
fn doctor_flags_inconsistent_records() {
    let mut state = AppState::default();
    let mut t = tx("2025-13-40", "Kroger", "10", "Snacks");
    t.items.push(Item::new("Chips", 1.into(), 3.into()));
    t.items[0].total_price = 4.into();
    state.transactions.push(t.clone());
    state.transactions.push(t);

    let config = Config {
        data_dir: std::env::temp_dir(),
        ai: AiConfig::default(),
    };
    let issues: Vec<String> = doctor::check(&state, &config)
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    for expected in [
        "missing_api_key",
        "duplicate_id",
        "bad_date",
        "items_mismatch",
        "item_total_mismatch",
        "unknown_category",
    ] {
        assert!(issues.iter().any(|i| i == expected), "missing {expected}");
    }

    let clean = Config {
        data_dir: std::env::temp_dir(),
        ai: AiConfig {
            api_key: Some("k".into()),
            ..AiConfig::default()
        },
    };
    assert!(doctor::check(&AppState::default(), &clean).is_empty());
}

#[test]
fn doctor_reports_overflowing_line_items() {
    let mut state = AppState::default();
    let mut t = tx("2025-01-02", "Costco", "0", "Groceries");
    let huge: rust_decimal::Decimal = "79228162514264337593543950335".parse().unwrap();
    t.items.push(Item::new("Pallet", huge, 2.into()));
    assert_eq!(t.items[0].total_price, 0.into());
    t.items[0].total_price = 1.into();
    state.transactions.push(t);

    let config = Config {
        data_dir: std::env::temp_dir(),
        ai: AiConfig {
            api_key: Some("k".into()),
            ..AiConfig::default()
        },
    };
    let issues = doctor::check(&state, &config);
    assert!(issues.iter().any(|r| r[0] == "item_total_mismatch"));
}

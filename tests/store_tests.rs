// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, memory_store, tx};
use spendsmart::db;
use spendsmart::models::{Budget, Theme, Transaction};
use spendsmart::state::{Action, Session};
use spendsmart::store::{
    ALL_KEYS, BUDGETS_KEY, KeyValueStore, SqliteStore, Store, THEME_KEY, TRANSACTIONS_KEY,
    USER_KEY,
};
use tempfile::tempdir;

#[test]
fn empty_store_loads_defaults() {
    let store = memory_store();
    assert!(store.load_user().is_none());
    assert!(store.load_transactions().is_empty());
    assert!(store.load_budgets().is_empty());
    assert!(store.load_theme().is_none());
}

#[test]
fn corrupt_values_fall_back_to_defaults() {
    let store = memory_store();
    store.backend().set(TRANSACTIONS_KEY, "{not json").unwrap();
    store.backend().set(BUDGETS_KEY, "42").unwrap();
    store.backend().set(THEME_KEY, "purple").unwrap();
    assert!(store.load_transactions().is_empty());
    assert!(store.load_budgets().is_empty());
    assert!(store.load_theme().is_none());
}

#[test]
fn theme_is_bare_text() {
    let store = memory_store();
    store.save_theme(Theme::Dark).unwrap();
    assert_eq!(
        store.backend().get(THEME_KEY).unwrap().as_deref(),
        Some("dark")
    );
    assert_eq!(store.load_theme(), Some(Theme::Dark));

    store.backend().set(THEME_KEY, "\"light\"").unwrap();
    assert_eq!(store.load_theme(), Some(Theme::Light));
}

#[test]
fn transactions_are_stored_as_camel_case_json() {
    let store = memory_store();
    let mut t = tx("2025-03-01", "Kroger", "12.5", "Groceries");
    t.is_recurring = true;
    store.save_transactions(std::slice::from_ref(&t)).unwrap();

    let raw = store.backend().get(TRANSACTIONS_KEY).unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["totalAmount"], serde_json::json!(12.5));
    assert_eq!(v[0]["type"], "EXPENSE");
    assert_eq!(v[0]["isRecurring"], true);
    assert_eq!(v[0]["source"], "MANUAL");

    let loaded: Vec<Transaction> = store.load_transactions();
    assert_eq!(loaded, vec![t]);
}

#[test]
fn records_missing_optional_fields_still_load() {
    let store = memory_store();
    store
        .backend()
        .set(
            TRANSACTIONS_KEY,
            r#"[{"id":"a","date":"2025-01-02","store":"Aldi","totalAmount":3,"category":"Groceries"}]"#,
        )
        .unwrap();
    let loaded = store.load_transactions();
    assert_eq!(loaded.len(), 1);
    assert!(loaded[0].items.is_empty());
    assert!(loaded[0].is_expense());
    assert!(!loaded[0].is_recurring);
}

#[test]
fn session_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let conn = db::open_or_init(dir.path()).unwrap();
        let mut session = Session::load(Store::new(SqliteStore::new(conn).unwrap()));
        session
            .dispatch(Action::Login {
                email: "ada@example.com".into(),
                name: String::new(),
            })
            .unwrap();
        session
            .dispatch(Action::AddTransaction(tx(
                "2025-03-01",
                "Kroger",
                "10",
                "Groceries",
            )))
            .unwrap();
        session
            .dispatch(Action::UpsertBudget(Budget {
                category: "Groceries".into(),
                limit: dec("200"),
            }))
            .unwrap();
        session.dispatch(Action::ToggleTheme).unwrap();
    }

    let conn = db::open_or_init(dir.path()).unwrap();
    let session = Session::load(Store::new(SqliteStore::new(conn).unwrap()));
    let state = session.state();
    assert_eq!(state.user.as_ref().unwrap().name, "ada");
    assert_eq!(state.transactions.len(), 1);
    assert_eq!(state.budgets[0].limit, dec("200"));
    assert_eq!(state.theme, Theme::Dark);
}

#[test]
fn logout_removes_user_key_only() {
    let mut session = common::signed_in_session();
    session.dispatch(Action::AddTransaction(tx("2025-03-01", "A", "1", "Other"))).unwrap();
    session.dispatch(Action::Logout).unwrap();

    let backend = session.store().backend();
    assert!(backend.get(USER_KEY).unwrap().is_none());
    assert!(backend.get(TRANSACTIONS_KEY).unwrap().is_some());
}

#[test]
fn partial_item_keeps_whole_list_loadable() {
    let store = memory_store();
    store
        .backend()
        .set(
            TRANSACTIONS_KEY,
            r#"[{"id":"a","date":"2025-01-02","store":"Aldi","totalAmount":3,"category":"Groceries","items":[{"name":"Milk"}]},
                {"id":"b","date":"2025-01-03","store":"Shell","totalAmount":40,"category":"Transport"}]"#,
        )
        .unwrap();
    let loaded = store.load_transactions();
    assert_eq!(loaded.len(), 2);
    let milk = &loaded[0].items[0];
    assert_eq!(milk.quantity, dec("1"));
    assert_eq!(milk.unit_price, dec("0"));
    assert_eq!(milk.total_price, dec("0"));
}

#[test]
fn saving_what_was_loaded_keeps_every_key_unchanged() {
    let store = memory_store();
    let backend = store.backend();
    backend
        .set(USER_KEY, r#"{"id":"1","name":"Ada","email":"ada@example.com"}"#)
        .unwrap();
    backend
        .set(
            TRANSACTIONS_KEY,
            r#"[{"id":"a","date":"2025-01-02","store":"Aldi","totalAmount":3.5,"category":"Groceries","items":[{"name":"Milk","quantity":1.0,"unitPrice":3.5,"totalPrice":3.5}],"type":"EXPENSE","isRecurring":false,"source":"RECEIPT"}]"#,
        )
        .unwrap();
    backend
        .set(BUDGETS_KEY, r#"[{"category":"Groceries","limit":200.0}]"#)
        .unwrap();
    backend.set(THEME_KEY, "dark").unwrap();

    let before: Vec<Option<String>> = ALL_KEYS.iter().map(|k| backend.get(k).unwrap()).collect();

    store.save_user(&store.load_user().unwrap()).unwrap();
    store.save_transactions(&store.load_transactions()).unwrap();
    store.save_budgets(&store.load_budgets()).unwrap();
    store.save_theme(store.load_theme().unwrap()).unwrap();

    for (key, old) in ALL_KEYS.iter().zip(before) {
        let new = backend.get(key).unwrap();
        if *key == THEME_KEY {
            assert_eq!(new, old);
            continue;
        }
        let old: serde_json::Value = serde_json::from_str(&old.unwrap()).unwrap();
        let new: serde_json::Value = serde_json::from_str(&new.unwrap()).unwrap();
        assert_eq!(new, old, "{key} changed");
    }
}

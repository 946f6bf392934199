// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, tx};
use spendsmart::models::{Budget, Theme};
use spendsmart::state::{Action, AppState, MOCK_USER_ID};

#[test]
fn login_defaults_name_to_email_local_part() {
    let mut state = AppState::default();
    let changed = state.apply(Action::Login {
        email: " grace@example.com ".into(),
        name: "  ".into(),
    });
    assert!(changed.user);
    let user = state.user.as_ref().unwrap();
    assert_eq!(user.id, MOCK_USER_ID);
    assert_eq!(user.email, "grace@example.com");
    assert_eq!(user.name, "grace");
}

#[test]
fn logout_keeps_data() {
    let mut state = AppState::default();
    state.apply(Action::Login {
        email: "a@b.c".into(),
        name: "A".into(),
    });
    state.apply(Action::AddTransaction(tx("2025-01-01", "Aldi", "3", "Groceries")));
    let changed = state.apply(Action::Logout);
    assert!(changed.user && !changed.transactions);
    assert!(!state.is_authenticated());
    assert_eq!(state.transactions.len(), 1);
}

#[test]
fn theme_toggles() {
    let mut state = AppState::default();
    assert_eq!(state.theme, Theme::Light);
    state.apply(Action::ToggleTheme);
    assert_eq!(state.theme, Theme::Dark);
    state.apply(Action::ToggleTheme);
    assert_eq!(state.theme, Theme::Light);
}

#[test]
fn update_and_delete_report_misses() {
    let mut state = AppState::default();
    let t = tx("2025-01-01", "Aldi", "3", "Groceries");
    state.apply(Action::AddTransaction(t.clone()));

    let mut edited = t.clone();
    edited.store = "Lidl".into();
    assert!(state.apply(Action::UpdateTransaction(edited)).transactions);
    assert_eq!(state.transactions[0].store, "Lidl");

    let ghost = tx("2025-01-01", "Ghost", "1", "Other");
    assert!(!state.apply(Action::UpdateTransaction(ghost)).any());
    assert!(!state.apply(Action::DeleteTransaction("nope".into())).any());

    assert!(state.apply(Action::DeleteTransaction(t.id.clone())).transactions);
    assert!(state.transactions.is_empty());
}

#[test]
fn batch_add_keeps_order_and_empty_batch_is_no_change() {
    let mut state = AppState::default();
    assert!(!state.apply(Action::AddTransactions(Vec::new())).any());
    state.apply(Action::AddTransactions(vec![
        tx("2025-01-01", "A", "1", "Other"),
        tx("2025-01-02", "B", "2", "Other"),
    ]));
    let stores: Vec<&str> = state.transactions.iter().map(|t| t.store.as_str()).collect();
    assert_eq!(stores, ["A", "B"]);
}

#[test]
fn budget_upsert_is_case_insensitive() {
    let mut state = AppState::default();
    state.apply(Action::UpsertBudget(Budget {
        category: "Groceries".into(),
        limit: dec("200"),
    }));
    state.apply(Action::UpsertBudget(Budget {
        category: "groceries".into(),
        limit: dec("250"),
    }));
    assert_eq!(state.budgets.len(), 1);
    assert_eq!(state.budgets[0].category, "Groceries");
    assert_eq!(state.budget("GROCERIES").unwrap().limit, dec("250"));

    assert!(state.apply(Action::RemoveBudget("GROCERIES".into())).budgets);
    assert!(state.budgets.is_empty());
}

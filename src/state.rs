// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state and the only ways to change it.
//!
//! [`AppState::apply`] is a reducer over [`Action`]; it reports which
//! persisted collections changed so [`Session`] writes back exactly those keys.

use crate::models::{Budget, Theme, Transaction, User};
use crate::store::{KeyValueStore, Store};
use anyhow::{Context, Result, anyhow};

pub const MOCK_USER_ID: &str = "1";
pub const GOOGLE_MOCK_EMAIL: &str = "user@gmail.com";
pub const GOOGLE_MOCK_NAME: &str = "Google User";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { email: String, name: String },
    Logout,
    ToggleTheme,
    SetTheme(Theme),
    AddTransaction(Transaction),
    AddTransactions(Vec<Transaction>),
    /// Replaces the transaction with the same id.
    UpdateTransaction(Transaction),
    DeleteTransaction(String),
    /// Updates the limit of the budget whose category matches case-insensitively, else appends.
    UpsertBudget(Budget),
    RemoveBudget(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changed {
    pub user: bool,
    pub theme: bool,
    pub transactions: bool,
    pub budgets: bool,
}

impl Changed {
    pub fn any(&self) -> bool {
        self.user || self.theme || self.transactions || self.budgets
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user: Option<User>,
    pub theme: Theme,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

fn display_name(email: &str, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        email.split('@').next().unwrap_or(email).to_string()
    } else {
        name.to_string()
    }
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn budget(&self, category: &str) -> Option<&Budget> {
        let wanted = category.to_lowercase();
        self.budgets
            .iter()
            .find(|b| b.category.to_lowercase() == wanted)
    }

    pub fn apply(&mut self, action: Action) -> Changed {
        let mut changed = Changed::default();
        match action {
            Action::Login { email, name } => {
                let email = email.trim().to_string();
                self.user = Some(User {
                    id: MOCK_USER_ID.to_string(),
                    name: display_name(&email, &name),
                    email,
                });
                changed.user = true;
            }
            Action::Logout => {
                self.user = None;
                changed.user = true;
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                changed.theme = true;
            }
            Action::SetTheme(theme) => {
                self.theme = theme;
                changed.theme = true;
            }
            Action::AddTransaction(t) => {
                self.transactions.push(t);
                changed.transactions = true;
            }
            Action::AddTransactions(ts) => {
                changed.transactions = !ts.is_empty();
                self.transactions.extend(ts);
            }
            Action::UpdateTransaction(updated) => {
                if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == updated.id) {
                    *slot = updated;
                    changed.transactions = true;
                }
            }
            Action::DeleteTransaction(id) => {
                let before = self.transactions.len();
                self.transactions.retain(|t| t.id != id);
                changed.transactions = self.transactions.len() != before;
            }
            Action::UpsertBudget(budget) => {
                match self
                    .budgets
                    .iter_mut()
                    .find(|b| b.category.to_lowercase() == budget.category.to_lowercase())
                {
                    Some(existing) => existing.limit = budget.limit,
                    None => self.budgets.push(budget),
                }
                changed.budgets = true;
            }
            Action::RemoveBudget(category) => {
                let wanted = category.to_lowercase();
                let before = self.budgets.len();
                self.budgets.retain(|b| b.category.to_lowercase() != wanted);
                changed.budgets = self.budgets.len() != before;
            }
        }
        changed
    }
}

/// State plus the store it was loaded from; every dispatched action is
/// written through immediately.
pub struct Session<S> {
    store: Store<S>,
    state: AppState,
}

impl<S: KeyValueStore> Session<S> {
    pub fn load(store: Store<S>) -> Self {
        let state = AppState {
            user: store.load_user(),
            theme: store.load_theme().unwrap_or_default(),
            transactions: store.load_transactions(),
            budgets: store.load_budgets(),
        };
        tracing::debug!(
            "Loaded {} transaction(s) and {} budget(s)",
            state.transactions.len(),
            state.budgets.len()
        );
        Self { store, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Applies `action` and writes back every collection it changed. A failed
    /// write is returned; the in-memory state keeps the change.
    pub fn dispatch(&mut self, action: Action) -> Result<Changed> {
        let changed = self.state.apply(action);
        self.persist(changed)?;
        Ok(changed)
    }

    fn persist(&self, changed: Changed) -> Result<()> {
        if changed.user {
            let res = match &self.state.user {
                Some(u) => self.store.save_user(u),
                None => self.store.clear_user(),
            };
            res.context("Failed to persist user")?;
        }
        if changed.theme {
            self.store
                .save_theme(self.state.theme)
                .context("Failed to persist theme")?;
        }
        if changed.transactions {
            self.store
                .save_transactions(&self.state.transactions)
                .context("Failed to persist transactions")?;
        }
        if changed.budgets {
            self.store
                .save_budgets(&self.state.budgets)
                .context("Failed to persist budgets")?;
        }
        Ok(())
    }

    pub fn require_user(&self) -> Result<&User> {
        self.state
            .user
            .as_ref()
            .ok_or_else(|| anyhow!("Not signed in; run `spendsmart login` first"))
    }
}

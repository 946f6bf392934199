// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-collection persistence over a string key-value backend.
//!
//! Every key holds one serialized collection and every write replaces it.
//! Reads never fail: a missing key yields the empty default and a value that
//! does not deserialize is logged and treated as missing.

use crate::errors::StoreError;
use crate::models::{Budget, Theme, Transaction, User};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const USER_KEY: &str = "spendSmart_user";
pub const TRANSACTIONS_KEY: &str = "spendSmart_transactions";
pub const BUDGETS_KEY: &str = "spendSmart_budgets";
pub const THEME_KEY: &str = "theme";

pub const ALL_KEYS: [&str; 4] = [USER_KEY, TRANSACTIONS_KEY, BUDGETS_KEY, THEME_KEY];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// String key-value table in SQLite, the native stand-in for browser local storage.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> anyhow::Result<Self> {
        crate::db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key=?1",
                params![key],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO local_storage(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key=?1", params![key])?;
        Ok(())
    }
}

pub struct Store<S> {
    backend: S,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Reading '{}' failed, using default: {}", key, e);
                None
            }
        }
    }

    /// Returns `None` when the key is absent or its value is not valid JSON for `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.raw(key)?;
        match serde_json::from_str::<T>(&text) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Stored value for '{}' is corrupt, using default: {}", key, e);
                None
            }
        }
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_default()
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &text)?;
        tracing::trace!("Saved '{}' ({} bytes)", key, text.len());
        Ok(())
    }

    pub fn load_user(&self) -> Option<User> {
        self.load(USER_KEY)
    }

    pub fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.save(USER_KEY, user)
    }

    pub fn clear_user(&self) -> Result<(), StoreError> {
        self.backend.remove(USER_KEY)
    }

    pub fn load_transactions(&self) -> Vec<Transaction> {
        self.load_or_default(TRANSACTIONS_KEY)
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        self.save(TRANSACTIONS_KEY, transactions)
    }

    pub fn load_budgets(&self) -> Vec<Budget> {
        self.load_or_default(BUDGETS_KEY)
    }

    pub fn save_budgets(&self, budgets: &[Budget]) -> Result<(), StoreError> {
        self.save(BUDGETS_KEY, budgets)
    }

    /// Theme is stored as bare `light`/`dark` text rather than JSON.
    pub fn load_theme(&self) -> Option<Theme> {
        let text = self.raw(THEME_KEY)?;
        match text.trim().trim_matches('"').parse::<Theme>() {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("Stored value for '{}' is corrupt, using default: {}", THEME_KEY, e);
                None
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.backend.set(THEME_KEY, theme.as_str())
    }
}

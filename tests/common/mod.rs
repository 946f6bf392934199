// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use rusqlite::Connection;
use rust_decimal::Decimal;
use spendsmart::ai::{ContentGenerator, GenerateRequest, GenerateResponse};
use spendsmart::errors::{AiError, StoreError};
use spendsmart::models::{Transaction, TransactionType};
use spendsmart::state::{Action, Session};
use spendsmart::store::{KeyValueStore, SqliteStore, Store, USER_KEY};
use std::cell::RefCell;
use std::collections::VecDeque;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn tx(date: &str, store: &str, amount: &str, category: &str) -> Transaction {
    Transaction::new_manual(
        date,
        store,
        dec(amount),
        category,
        TransactionType::Expense,
        false,
    )
}

pub fn recurring(date: &str, store: &str, amount: &str, category: &str) -> Transaction {
    let mut t = tx(date, store, amount, category);
    t.is_recurring = true;
    t
}

pub fn memory_store() -> Store<SqliteStore> {
    let conn = Connection::open_in_memory().unwrap();
    Store::new(SqliteStore::new(conn).unwrap())
}

pub fn signed_in_session() -> Session<SqliteStore> {
    let mut session = Session::load(memory_store());
    session
        .dispatch(Action::Login {
            email: "ada@example.com".into(),
            name: "Ada".into(),
        })
        .unwrap();
    session
}

/// Reads from the wrapped store; every write fails the way a read-only database does.
pub struct ReadOnlyStore(pub SqliteStore);

impl ReadOnlyStore {
    fn refuse() -> StoreError {
        StoreError::Backend(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_READONLY),
            Some("attempt to write a readonly database".into()),
        ))
    }
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::refuse())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(Self::refuse())
    }
}

/// Signed-in session whose store rejects every write.
pub fn read_only_session() -> Session<ReadOnlyStore> {
    let inner = SqliteStore::new(Connection::open_in_memory().unwrap()).unwrap();
    inner
        .set(USER_KEY, r#"{"id":"1","name":"Ada","email":"ada@example.com"}"#)
        .unwrap();
    Session::load(Store::new(ReadOnlyStore(inner)))
}

/// Replays canned replies in order and keeps every request it was sent.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<GenerateResponse, AiError>>>,
    pub requests: RefCell<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        let g = Self::default();
        g.push(Ok(GenerateResponse::from_text(text)));
        g
    }

    pub fn failing(err: AiError) -> Self {
        let g = Self::default();
        g.push(Err(err));
        g
    }

    pub fn push(&self, reply: Result<GenerateResponse, AiError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn prompt(&self, n: usize) -> String {
        self.requests.borrow()[n].contents[0]
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl ContentGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Decode("no scripted reply left".into())))
    }
}

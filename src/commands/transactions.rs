// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::{infer_category, is_known_category};
use crate::models::{Transaction, TransactionType};
use crate::state::{Action, AppState, Session};
use crate::store::KeyValueStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_index, parse_month,
    pretty_table, today,
};
use anyhow::{Result, anyhow, bail};
use serde::Serialize;

pub fn handle<S: KeyValueStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    session.require_user()?;
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub)?,
        Some(("list", sub)) => list(session.state(), sub)?,
        Some(("show", sub)) => show(session.state(), sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => remove(session, sub)?,
        Some(("item-add", sub)) => item_add(session, sub)?,
        Some(("item-set", sub)) => item_set(session, sub)?,
        Some(("item-rm", sub)) => item_rm(session, sub)?,
        Some(("recalc", sub)) => recalc(session, sub)?,
        _ => {}
    }
    Ok(())
}

/// Accepts a full id or an unambiguous prefix of one.
pub fn resolve_id(state: &AppState, raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("Transaction id is empty");
    }
    if let Some(t) = state.transaction(raw) {
        return Ok(t.id.clone());
    }
    let matches: Vec<&Transaction> = state
        .transactions
        .iter()
        .filter(|t| t.id.starts_with(raw))
        .collect();
    match matches.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => Err(anyhow!("Transaction '{}' not found", raw)),
        _ => Err(anyhow!(
            "Transaction id '{}' is ambiguous ({} matches)",
            raw,
            matches.len()
        )),
    }
}

fn warn_unknown_category(category: &str) {
    if !is_known_category(category) {
        tracing::warn!("'{}' is not one of the suggested categories", category);
    }
}

fn add<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let store = sub.get_one::<String>("store").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let tx_type = match sub.get_one::<String>("type") {
        Some(t) => t.parse::<TransactionType>()?,
        None => TransactionType::Expense,
    };
    let category = match sub
        .get_one::<String>("category")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        Some(c) => {
            warn_unknown_category(c);
            c.to_string()
        }
        None => infer_category(&store, std::iter::empty::<&str>()).to_string(),
    };
    let t = Transaction::new_manual(
        date.to_string(),
        store,
        amount,
        category,
        tx_type,
        sub.get_flag("recurring"),
    );
    let line = format!(
        "Recorded {} {} at '{}' on {} [{}] (id {})",
        t.tx_type.as_str().to_lowercase(),
        fmt_money(&t.total_amount),
        t.store,
        t.date,
        t.category,
        t.id
    );
    session.dispatch(Action::AddTransaction(t))?;
    println!("{}", line);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub store: String,
    pub amount: String,
    pub category: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub recurring: bool,
    pub source: String,
    pub items: usize,
}

pub fn query_rows(state: &AppState, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_lowercase());
    let store = sub.get_one::<String>("store").map(|s| s.trim().to_lowercase());

    let mut selected: Vec<&Transaction> = state
        .transactions
        .iter()
        .filter(|t| month.as_deref().is_none_or(|m| t.month_key() == m))
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.to_lowercase() == c)
        })
        .filter(|t| {
            store
                .as_deref()
                .is_none_or(|s| t.store.to_lowercase().contains(s))
        })
        .collect();
    // Newest first; insertion order breaks ties, latest insert first.
    selected.reverse();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        selected.truncate(*limit);
    }

    Ok(selected
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.clone(),
            store: t.store.clone(),
            amount: format!("{:.2}", t.total_amount),
            category: t.category.clone(),
            tx_type: t.tx_type.as_str().to_string(),
            recurring: t.is_recurring,
            source: t.source.as_str().to_string(),
            items: t.items.len(),
        })
        .collect())
}

fn list(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(state, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.chars().take(8).collect(),
                    r.date.clone(),
                    r.store.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.tx_type.clone(),
                    if r.recurring { "yes".into() } else { String::new() },
                    r.items.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Store", "Amount", "Category", "Type", "Recurring", "Items"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn print_transaction(t: &Transaction) {
    println!(
        "{}  {}  {}  {}  [{}]{}",
        t.id,
        t.date,
        t.store,
        fmt_money(&t.total_amount),
        t.category,
        if t.is_recurring { "  recurring" } else { "" }
    );
    if t.items.is_empty() {
        return;
    }
    let rows = t
        .items
        .iter()
        .enumerate()
        .map(|(i, it)| {
            vec![
                i.to_string(),
                it.name.clone(),
                it.quantity.normalize().to_string(),
                format!("{:.2}", it.unit_price),
                format!("{:.2}", it.total_price),
                it.category.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["#", "Item", "Qty", "Unit", "Total", "Category"], rows)
    );
    let items_total = t.items_total();
    if items_total != t.total_amount {
        println!(
            "Items sum to {} (total is {}); `tx recalc` sets the total from items",
            fmt_money(&items_total),
            fmt_money(&t.total_amount)
        );
    }
}

fn show(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_id(state, sub.get_one::<String>("id").unwrap())?;
    let t = state
        .transaction(&id)
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), t)? {
        print_transaction(t);
    }
    Ok(())
}

/// Copies the transaction out, applies `f`, and writes it back through the reducer.
fn modify<S, F>(session: &mut Session<S>, raw_id: &str, f: F) -> Result<Transaction>
where
    S: KeyValueStore,
    F: FnOnce(&mut Transaction) -> Result<()>,
{
    let id = resolve_id(session.state(), raw_id)?;
    let mut t = session
        .state()
        .transaction(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    f(&mut t)?;
    let changed = session.dispatch(Action::UpdateTransaction(t.clone()))?;
    if !changed.transactions {
        bail!("Transaction '{}' not found", id);
    }
    Ok(t)
}

fn edit<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let t = modify(session, sub.get_one::<String>("id").unwrap(), |t| {
        if let Some(d) = sub.get_one::<String>("date") {
            t.date = parse_date(d)?.to_string();
        }
        if let Some(s) = sub.get_one::<String>("store") {
            t.store = s.trim().to_string();
        }
        if let Some(a) = sub.get_one::<String>("amount") {
            t.total_amount = parse_decimal(a)?;
        }
        if let Some(c) = sub.get_one::<String>("category") {
            let c = c.trim();
            warn_unknown_category(c);
            t.category = c.to_string();
        }
        if let Some(ty) = sub.get_one::<String>("type") {
            t.tx_type = ty.parse()?;
        }
        if let Some(r) = sub.get_one::<bool>("recurring") {
            t.is_recurring = *r;
        }
        Ok(())
    })?;
    println!("Updated transaction {}", t.id);
    print_transaction(&t);
    Ok(())
}

fn remove<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_id(session.state(), sub.get_one::<String>("id").unwrap())?;
    session.dispatch(Action::DeleteTransaction(id.clone()))?;
    println!("Removed transaction {}", id);
    Ok(())
}

fn item_add<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let t = modify(session, sub.get_one::<String>("id").unwrap(), |t| {
        let quantity = sub
            .get_one::<String>("quantity")
            .map(|q| parse_decimal(q))
            .transpose()?;
        let price = sub
            .get_one::<String>("price")
            .map(|p| parse_decimal(p))
            .transpose()?;
        let item = t.add_item();
        if let Some(n) = sub.get_one::<String>("name") {
            item.name = n.trim().to_string();
        }
        if let Some(c) = sub.get_one::<String>("category") {
            item.category = Some(c.trim().to_string());
        }
        let index = t.items.len() - 1;
        if let Some(q) = quantity {
            t.set_item_quantity(index, q)?;
        }
        if let Some(p) = price {
            t.set_item_unit_price(index, p)?;
        }
        Ok(())
    })?;
    println!("Added item {} to {}", t.items.len() - 1, t.id);
    print_transaction(&t);
    Ok(())
}

fn item_set<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let index = parse_index(sub.get_one::<String>("index").unwrap())?;
    let t = modify(session, sub.get_one::<String>("id").unwrap(), |t| {
        if let Some(n) = sub.get_one::<String>("name") {
            t.item_mut(index)?.name = n.trim().to_string();
        }
        if let Some(c) = sub.get_one::<String>("category") {
            t.item_mut(index)?.category = Some(c.trim().to_string());
        }
        if let Some(q) = sub.get_one::<String>("quantity") {
            t.set_item_quantity(index, parse_decimal(q)?)?;
        }
        if let Some(p) = sub.get_one::<String>("price") {
            t.set_item_unit_price(index, parse_decimal(p)?)?;
        }
        Ok(())
    })?;
    print_transaction(&t);
    Ok(())
}

fn item_rm<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let index = parse_index(sub.get_one::<String>("index").unwrap())?;
    let t = modify(session, sub.get_one::<String>("id").unwrap(), |t| {
        t.remove_item(index).map(|_| ())
    })?;
    println!("Removed item {} from {}", index, t.id);
    Ok(())
}

fn recalc<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let t = modify(session, sub.get_one::<String>("id").unwrap(), |t| {
        t.recalculate_total();
        Ok(())
    })?;
    println!("Total for {} is now {}", t.id, fmt_money(&t.total_amount));
    Ok(())
}

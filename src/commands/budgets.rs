// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::budget_overview;
use crate::categorize::is_known_category;
use crate::models::Budget;
use crate::state::{Action, AppState, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: KeyValueStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    session.require_user()?;
    match m.subcommand() {
        Some(("set", sub)) => set(session, sub)?,
        Some(("list", sub)) => list(session, sub)?,
        Some(("rm", sub)) => remove(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn set<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        bail!("Budget category is empty");
    }
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    if !is_known_category(&category) {
        tracing::warn!("'{}' is not one of the suggested categories", category);
    }
    session.dispatch(Action::UpsertBudget(Budget {
        category: category.clone(),
        limit,
    }))?;
    println!("Budget set for {} = {}", category, fmt_money(&limit));
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetRow {
    pub category: String,
    pub limit: String,
    pub spent: String,
    pub percentage: String,
    pub status: String,
}

pub fn rows(state: &AppState) -> Vec<BudgetRow> {
    budget_overview(&state.transactions, &state.budgets)
        .into_iter()
        .map(|(b, p)| BudgetRow {
            category: b.category,
            limit: format!("{:.2}", p.limit),
            spent: format!("{:.2}", p.spent),
            percentage: format!("{:.0}", p.percentage),
            status: p.status.label().to_string(),
        })
        .collect()
}

fn list<S: KeyValueStore>(session: &Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(session.state());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("No budgets set; use `budget set --category <name> --limit <amount>`");
            return Ok(());
        }
        let table = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    format!("{}%", r.percentage),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Used", "Status"], table)
        );
    }
    Ok(())
}

fn remove<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let changed = session.dispatch(Action::RemoveBudget(category.clone()))?;
    if !changed.budgets {
        bail!("No budget for '{}'", category);
    }
    println!("Removed budget for {}", category);
    Ok(())
}

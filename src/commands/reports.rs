// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    DEFAULT_HISTORY_MONTHS, NamedAmount, item_breakdown, monthly_history, recent,
    recurring_groups, recurring_monthly_total, total_recurring, total_spent,
};
use crate::state::{AppState, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

const RECENT_COUNT: usize = 5;

pub fn handle<S: KeyValueStore>(session: &Session<S>, m: &clap::ArgMatches) -> Result<()> {
    session.require_user()?;
    let state = session.state();
    match m.subcommand() {
        Some(("summary", sub)) => summary(state, sub)?,
        Some(("by-category", sub)) => named(
            &crate::aggregate::spend_by_category(&state.transactions),
            "Category",
            sub,
        )?,
        Some(("by-store", sub)) => named(
            &crate::aggregate::spend_by_store(&state.transactions),
            "Store",
            sub,
        )?,
        Some(("history", sub)) => history(state, sub)?,
        Some(("recurring", sub)) => recurring(state, sub)?,
        Some(("items", sub)) => items(state, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct Summary {
    pub total_spent: String,
    pub recurring_total: String,
    pub recurring_monthly: String,
    pub transactions: usize,
    pub recent: Vec<RecentRow>,
}

#[derive(Serialize)]
pub struct RecentRow {
    pub date: String,
    pub store: String,
    pub amount: String,
    pub category: String,
}

pub fn summarize(state: &AppState) -> Summary {
    let txs = &state.transactions;
    Summary {
        total_spent: format!("{:.2}", total_spent(txs)),
        recurring_total: format!("{:.2}", total_recurring(txs)),
        recurring_monthly: format!("{:.2}", recurring_monthly_total(txs)),
        transactions: txs.len(),
        recent: recent(txs, RECENT_COUNT)
            .into_iter()
            .map(|t| RecentRow {
                date: t.date.clone(),
                store: t.store.clone(),
                amount: format!("{:.2}", t.total_amount),
                category: t.category.clone(),
            })
            .collect(),
    }
}

fn summary(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let s = summarize(state);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["Total spent".into(), format!("${}", s.total_spent)],
                vec!["Recurring (flagged)".into(), format!("${}", s.recurring_total)],
                vec!["Recurring per month".into(), format!("${}", s.recurring_monthly)],
                vec!["Transactions".into(), s.transactions.to_string()],
            ],
        )
    );
    if !s.recent.is_empty() {
        let rows = s
            .recent
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.store.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!("Recent activity");
        println!(
            "{}",
            pretty_table(&["Date", "Store", "Amount", "Category"], rows)
        );
    }
    Ok(())
}

fn named(data: &[NamedAmount], label: &str, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|n| vec![n.name.clone(), format!("{:.2}", n.value)])
        .collect();
    println!("{}", pretty_table(&[label, "Spent"], rows));
    Ok(())
}

fn history(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub
        .get_one::<usize>("months")
        .unwrap_or(&DEFAULT_HISTORY_MONTHS);
    let as_of: NaiveDate = match sub.get_one::<String>("as_of") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let buckets = monthly_history(&state.transactions, as_of, months);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|b| vec![b.month.clone(), b.label.clone(), format!("{:.2}", b.amount)])
        .collect();
    println!("{}", pretty_table(&["Month", "Label", "Spent"], rows));
    Ok(())
}

fn recurring(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let groups = recurring_groups(&state.transactions);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups)? {
        return Ok(());
    }
    if groups.is_empty() {
        println!("No recurring payments detected");
        return Ok(());
    }
    let rows = groups
        .iter()
        .map(|t| {
            vec![
                t.store.clone(),
                t.date.clone(),
                format!("{:.2}", t.total_amount),
                t.category.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Store", "Last charged", "Amount", "Category"], rows)
    );
    println!(
        "Estimated monthly: {}",
        fmt_money(&recurring_monthly_total(&state.transactions))
    );
    Ok(())
}

fn items(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let breakdown = item_breakdown(&state.transactions);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &breakdown)? {
        return Ok(());
    }
    let mut rows = Vec::new();
    for (category, items) in &breakdown {
        for (name, totals) in items {
            rows.push(vec![
                category.clone(),
                name.clone(),
                totals.quantity.normalize().to_string(),
                format!("{:.2}", totals.total),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Category", "Item", "Qty", "Spent"], rows)
    );
    Ok(())
}

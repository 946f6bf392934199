// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the in-memory transaction list.
//!
//! Everything here is a pure function of its arguments.

use crate::models::{Budget, OTHER_CATEGORY, Transaction};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_HISTORY_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAmount {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub month: String,
    /// Short month name, e.g. `Jan`.
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemTotals {
    pub quantity: Decimal,
    pub total: Decimal,
}

pub type ItemBreakdown = BTreeMap<String, BTreeMap<String, ItemTotals>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    OnTrack,
    NearingLimit,
    Exceeded,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::NearingLimit => "Nearing Limit",
            Self::Exceeded => "Exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub spent: Decimal,
    pub limit: Decimal,
    /// Share of the limit used, capped at 100.
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

/// Sums `value` per key, keeping keys in first-seen order.
fn sum_by_key<'a, F>(transactions: &'a [Transaction], key: F) -> Vec<NamedAmount>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<NamedAmount> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let k = key(t);
        match index.get(k) {
            Some(&i) => out[i].value += t.total_amount,
            None => {
                index.insert(k, out.len());
                out.push(NamedAmount {
                    name: k.to_string(),
                    value: t.total_amount,
                });
            }
        }
    }
    out
}

pub fn spend_by_category(transactions: &[Transaction]) -> Vec<NamedAmount> {
    sum_by_key(transactions, |t| t.category.as_str())
}

pub fn spend_by_store(transactions: &[Transaction]) -> Vec<NamedAmount> {
    sum_by_key(transactions, |t| t.store.as_str())
}

pub fn total_spent(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.total_amount)
        .sum()
}

/// Sum over every transaction flagged recurring, regardless of type or store.
pub fn total_recurring(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_recurring)
        .map(|t| t.total_amount)
        .sum()
}

/// Expense totals for the `month_count` calendar months ending at `now`, oldest first.
pub fn monthly_history(
    transactions: &[Transaction],
    now: NaiveDate,
    month_count: usize,
) -> Vec<MonthBucket> {
    let anchor = now.with_day(1).unwrap_or(now);
    let mut buckets: Vec<MonthBucket> = (0..month_count)
        .rev()
        .filter_map(|back| anchor.checked_sub_months(Months::new(back as u32)))
        .map(|d| MonthBucket {
            month: d.format("%Y-%m").to_string(),
            label: d.format("%b").to_string(),
            amount: Decimal::ZERO,
        })
        .collect();

    for t in transactions.iter().filter(|t| t.is_expense()) {
        let key = t.month_key();
        if let Some(b) = buckets.iter_mut().find(|b| b.month == key) {
            b.amount += t.total_amount;
        }
    }
    buckets
}

fn parse_iso(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d").ok()
}

fn is_later(candidate: &str, current: &str) -> bool {
    match (parse_iso(candidate), parse_iso(current)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

/// Latest recurring transaction per store (trimmed, case-insensitive), largest amount first.
pub fn recurring_groups(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<&Transaction> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_recurring) {
        let key = t.store.trim().to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                if is_later(&t.date, &groups[i].date) {
                    groups[i] = t;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(t);
            }
        }
    }
    let mut out: Vec<Transaction> = groups.into_iter().cloned().collect();
    out.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    out
}

/// Estimated monthly cost of recurring bills: one charge per grouped store.
pub fn recurring_monthly_total(transactions: &[Transaction]) -> Decimal {
    recurring_groups(transactions)
        .iter()
        .map(|t| t.total_amount)
        .sum()
}

pub fn item_breakdown(transactions: &[Transaction]) -> ItemBreakdown {
    let mut breakdown = ItemBreakdown::new();
    for t in transactions
        .iter()
        .filter(|t| t.is_expense() && !t.items.is_empty())
    {
        for item in &t.items {
            let category = item
                .category
                .as_deref()
                .filter(|c| !c.is_empty())
                .or(Some(t.category.as_str()).filter(|c| !c.is_empty()))
                .unwrap_or(OTHER_CATEGORY);
            let entry = breakdown
                .entry(category.to_string())
                .or_default()
                .entry(item.name.trim().to_string())
                .or_default();
            entry.quantity += item.quantity;
            entry.total += item.total_price;
        }
    }
    breakdown
}

pub fn spent_for_category(transactions: &[Transaction], category: &str) -> Decimal {
    let wanted = category.to_lowercase();
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category.to_lowercase() == wanted)
        .map(|t| t.total_amount)
        .sum()
}

pub fn budget_status(spent: Decimal, limit: Decimal) -> BudgetProgress {
    let hundred = Decimal::ONE_HUNDRED;
    if limit <= Decimal::ZERO {
        return BudgetProgress {
            spent,
            limit,
            percentage: hundred,
            status: BudgetStatus::Exceeded,
        };
    }
    // Out-of-range ratios can only come from a spend far beyond the limit.
    let ratio = spent
        .checked_div(limit)
        .and_then(|r| r.checked_mul(hundred))
        .unwrap_or(hundred);
    let status = if ratio >= hundred {
        BudgetStatus::Exceeded
    } else if ratio > Decimal::from(85) {
        BudgetStatus::NearingLimit
    } else {
        BudgetStatus::OnTrack
    };
    BudgetProgress {
        spent,
        limit,
        percentage: ratio.min(hundred),
        status,
    }
}

pub fn budget_overview(
    transactions: &[Transaction],
    budgets: &[Budget],
) -> Vec<(Budget, BudgetProgress)> {
    budgets
        .iter()
        .map(|b| {
            let spent = spent_for_category(transactions, &b.category);
            (b.clone(), budget_status(spent, b.limit))
        })
        .collect()
}

/// Last `n` transactions, newest entry first.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    transactions.iter().rev().take(n).collect()
}

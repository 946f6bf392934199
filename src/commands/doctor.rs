// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::is_known_category;
use crate::config::Config;
use crate::state::AppState;
use crate::utils::{parse_date, pretty_table};
use anyhow::Result;
use std::collections::HashSet;

/// Returns `[issue, detail]` rows for everything that looks inconsistent.
pub fn check(state: &AppState, config: &Config) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    if config.ai.api_key.is_none() {
        rows.push(vec![
            "missing_api_key".into(),
            "set API_KEY or GEMINI_API_KEY to enable scan and advise".into(),
        ]);
    }

    let mut seen = HashSet::new();
    for t in &state.transactions {
        if !seen.insert(t.id.as_str()) {
            rows.push(vec!["duplicate_id".into(), t.id.clone()]);
        }
        if parse_date(&t.date).is_err() {
            rows.push(vec!["bad_date".into(), format!("{} {}", t.id, t.date)]);
        }
        for (i, item) in t.items.iter().enumerate() {
            if item.quantity.checked_mul(item.unit_price) != Some(item.total_price) {
                rows.push(vec![
                    "item_total_mismatch".into(),
                    format!("{} #{} {}", t.id, i, item.name),
                ]);
            }
        }
        if !t.items.is_empty() {
            let items_total = t.items_total();
            if items_total != t.total_amount {
                rows.push(vec![
                    "items_mismatch".into(),
                    format!("{} total {:.2} items {:.2}", t.id, t.total_amount, items_total),
                ]);
            }
        }
        if !is_known_category(&t.category) {
            rows.push(vec![
                "unknown_category".into(),
                format!("{} {}", t.id, t.category),
            ]);
        }
    }

    for b in &state.budgets {
        if b.limit <= rust_decimal::Decimal::ZERO {
            rows.push(vec![
                "non_positive_budget".into(),
                format!("{} {}", b.category, b.limit),
            ]);
        }
    }
    rows
}

pub fn handle(state: &AppState, config: &Config) -> Result<()> {
    let rows = check(state, config);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ai::ContentGenerator;
use crate::ingest::ReceiptScanner;
use crate::models::Transaction;
use crate::state::{Action, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, guess_mime_type, maybe_print_json, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::Path;

pub const SCAN_FAILED: &str = "Failed to analyze image. Please try again with a clearer image.";

/// Reads the document, extracts its transactions and, with `--save`, records
/// all of them in one batch.
pub fn run<S, G>(
    session: &mut Session<S>,
    generator: G,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<Transaction>>
where
    S: KeyValueStore,
    G: ContentGenerator,
{
    session.require_user()?;
    let path = Path::new(sub.get_one::<String>("path").unwrap());
    let mime = match sub.get_one::<String>("mime") {
        Some(m) => m.trim().to_string(),
        None => guess_mime_type(path)?.to_string(),
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let scanner = ReceiptScanner::new(generator);
    let extracted = match scanner.scan(&bytes, &mime, today) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::error!("Extraction of {} failed: {}", path.display(), e);
            bail!(SCAN_FAILED);
        }
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &extracted)? {
        if extracted.is_empty() {
            println!("No transactions found in {}", path.display());
        } else {
            let rows = extracted
                .iter()
                .map(|t| {
                    vec![
                        t.date.clone(),
                        t.store.clone(),
                        fmt_money(&t.total_amount),
                        t.category.clone(),
                        t.items.len().to_string(),
                        if t.is_recurring { "yes".into() } else { String::new() },
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["Date", "Store", "Amount", "Category", "Items", "Recurring"],
                    rows
                )
            );
        }
    }

    if sub.get_flag("save") && !extracted.is_empty() {
        session.dispatch(Action::AddTransactions(extracted.clone()))?;
        eprintln!("Saved {} transaction(s)", extracted.len());
    } else if !extracted.is_empty() {
        eprintln!("Re-run with --save to record these transactions");
    }
    Ok(extracted)
}

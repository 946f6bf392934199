// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::state::Session;
use crate::store::KeyValueStore;
use anyhow::{Result, bail};
use std::path::Path;

pub fn handle<S: KeyValueStore>(session: &Session<S>, m: &clap::ArgMatches) -> Result<()> {
    session.require_user()?;
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            export_transactions(&session.state().transactions, &fmt, Path::new(out))?;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// CSV gets one row per transaction with items flattened to `name x qty`;
/// JSON is the stored shape.
pub fn export_transactions(txs: &[Transaction], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "store", "amount", "category", "type", "recurring", "source",
                "items",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.id.clone(),
                    t.date.clone(),
                    t.store.clone(),
                    format!("{:.2}", t.total_amount),
                    t.category.clone(),
                    t.tx_type.as_str().to_string(),
                    t.is_recurring.to_string(),
                    t.source.as_str().to_string(),
                    t.items
                        .iter()
                        .map(|i| format!("{} x {}", i.name, i.quantity.normalize()))
                        .collect::<Vec<_>>()
                        .join("; "),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(txs)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!("Wrote {} transaction(s) to {}", txs.len(), out.display());
    Ok(())
}

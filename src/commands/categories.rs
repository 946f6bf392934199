// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{SUGGESTED_CATEGORIES, sub_categories};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct CategoryRow {
    name: &'static str,
    sub_categories: &'static [&'static str],
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let rows: Vec<CategoryRow> = SUGGESTED_CATEGORIES
            .iter()
            .map(|c| CategoryRow {
                name: c,
                sub_categories: sub_categories(c),
            })
            .collect();
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
            let data = rows
                .iter()
                .map(|r| vec![r.name.to_string(), r.sub_categories.join(", ")])
                .collect();
            println!("{}", pretty_table(&["Category", "Sub-categories"], data));
        }
    }
    Ok(())
}

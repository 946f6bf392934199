// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Theme;
use crate::state::{Action, Session};
use crate::store::KeyValueStore;
use anyhow::Result;

pub fn handle<S: KeyValueStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("toggle", _)) => {
            session.dispatch(Action::ToggleTheme)?;
        }
        Some(("set", sub)) => {
            let theme: Theme = sub.get_one::<String>("theme").unwrap().parse()?;
            session.dispatch(Action::SetTheme(theme))?;
        }
        _ => {}
    }
    println!("Theme: {}", session.state().theme);
    Ok(())
}

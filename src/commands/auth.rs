// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::{Action, GOOGLE_MOCK_EMAIL, GOOGLE_MOCK_NAME, Session};
use crate::store::KeyValueStore;
use anyhow::{Result, anyhow};

pub fn login<S: KeyValueStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (email, name) = if sub.get_flag("google") {
        (GOOGLE_MOCK_EMAIL.to_string(), GOOGLE_MOCK_NAME.to_string())
    } else {
        let email = sub
            .get_one::<String>("email")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("--email is required"))?;
        let name = sub.get_one::<String>("name").cloned().unwrap_or_default();
        (email, name)
    };
    session.dispatch(Action::Login { email, name })?;
    let user = session.require_user()?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn logout<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    if !session.state().is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }
    session.dispatch(Action::Logout)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami<S: KeyValueStore>(session: &Session<S>) -> Result<()> {
    match &session.state().user {
        Some(u) => println!("{} <{}>", u.name, u.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

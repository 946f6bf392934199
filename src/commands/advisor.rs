// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::advisor::{Advisor, ChatMessage, ChatSession};
use crate::ai::ContentGenerator;
use crate::state::Session;
use crate::store::KeyValueStore;
use anyhow::{Result, bail};

pub fn run<S, G>(session: &Session<S>, generator: G, sub: &clap::ArgMatches) -> Result<ChatMessage>
where
    S: KeyValueStore,
    G: ContentGenerator,
{
    session.require_user()?;
    let query = sub.get_one::<String>("query").unwrap();
    let advisor = Advisor::new(generator).with_web_search(sub.get_flag("web_search"));
    let mut chat = ChatSession::new(advisor);
    let Some(reply) = chat.ask(&session.state().transactions, query) else {
        bail!("Ask a question with --query");
    };
    println!("{}", reply.content);
    if !reply.citations.is_empty() {
        println!();
        println!("Sources:");
        for c in &reply.citations {
            match &c.title {
                Some(title) => println!("- {} ({})", title, c.uri),
                None => println!("- {}", c.uri),
            }
        }
    }
    Ok(reply.clone())
}

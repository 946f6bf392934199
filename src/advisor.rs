// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ai::{Citation, Content, ContentGenerator, GenerateRequest, Part, Tool};
use crate::errors::AdvisorError;
use crate::models::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;

pub const MAX_SUMMARY_TRANSACTIONS: usize = 50;
pub const EMPTY_REPLY: &str = "I couldn't generate a response. Please try again.";
pub const CONNECTION_ERROR_REPLY: &str =
    "Sorry, I encountered an error connecting to the AI service.";

const PERSONA: &str = "You are SpendSmartAI, a friendly but direct personal finance coach.";

const TASKS: &str = r#"Tasks:
1. Analyse their spending patterns (e.g., overspending categories, recurring bills, obvious savings).
2. Answer the user's query specifically.
3. Give concrete, actionable suggestions (e.g., "Set a weekly grocery cap of $X", "Cancel subscription Y", "Switch to a cheaper provider").
4. If relevant, mention rough percentage splits between key categories (Groceries, Housing, Transport, etc.).

Format your response in clear markdown with:
- short paragraphs
- bullet points
- section headings like "Overview", "Key Issues", "Recommendations"."#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub store: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: String,
    pub items: String,
    pub category: String,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// The most recent transactions by date, capped at [`MAX_SUMMARY_TRANSACTIONS`].
pub fn summarize(transactions: &[Transaction]) -> Vec<TransactionSummary> {
    let mut newest: Vec<&Transaction> = transactions.iter().collect();
    newest.sort_by(|a, b| b.date.cmp(&a.date));
    newest
        .into_iter()
        .take(MAX_SUMMARY_TRANSACTIONS)
        .map(|t| TransactionSummary {
            store: t.store.clone(),
            amount: t.total_amount,
            date: t.date.clone(),
            items: t
                .items
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            category: t.category.clone(),
            is_recurring: t.is_recurring,
        })
        .collect()
}

pub fn build_prompt(summary: &[TransactionSummary], query: &str) -> Result<String, AdvisorError> {
    let json = serde_json::to_string_pretty(summary)?;
    Ok(format!(
        "{PERSONA}\n\nHere is a summary of the user's recent transactions as JSON:\n{json}\n\nUser query:\n\"{query}\"\n\n{TASKS}"
    ))
}

pub struct Advisor<G> {
    generator: G,
    web_search: bool,
}

impl<G: ContentGenerator> Advisor<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            web_search: false,
        }
    }

    /// Lets the service ground its answer with web results; citations come back with the advice.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn build_request(
        &self,
        transactions: &[Transaction],
        query: &str,
    ) -> Result<GenerateRequest, AdvisorError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AdvisorError::EmptyQuery);
        }
        let summary = summarize(transactions);
        let prompt = build_prompt(&summary, query)?;
        Ok(GenerateRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: None,
            tools: if self.web_search {
                vec![Tool::web_search()]
            } else {
                Vec::new()
            },
        })
    }

    pub fn advise(&self, transactions: &[Transaction], query: &str) -> Result<Advice, AdvisorError> {
        let request = self.build_request(transactions, query)?;
        tracing::info!(
            "Asking advisor with {} of {} transaction(s)",
            transactions.len().min(MAX_SUMMARY_TRANSACTIONS),
            transactions.len()
        );
        let response = self.generator.generate(&request)?;
        Ok(Advice {
            text: response.text(),
            citations: response.citations(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub citations: Vec<Citation>,
}

/// Transcript of one advisor conversation. Failures become assistant
/// messages so the conversation can continue.
pub struct ChatSession<G> {
    advisor: Advisor<G>,
    messages: Vec<ChatMessage>,
}

impl<G: ContentGenerator> ChatSession<G> {
    pub fn new(advisor: Advisor<G>) -> Self {
        Self {
            advisor,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the assistant reply, or `None` for a blank query (nothing is recorded).
    pub fn ask(&mut self, transactions: &[Transaction], query: &str) -> Option<&ChatMessage> {
        if query.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            role: Role::User,
            content: query.to_string(),
            citations: Vec::new(),
        });
        let reply = match self.advisor.advise(transactions, query) {
            Ok(advice) if advice.text.trim().is_empty() => ChatMessage {
                role: Role::Assistant,
                content: EMPTY_REPLY.to_string(),
                citations: advice.citations,
            },
            Ok(advice) => ChatMessage {
                role: Role::Assistant,
                content: advice.text,
                citations: advice.citations,
            },
            Err(e) => {
                tracing::error!("Advisor request failed: {}", e);
                ChatMessage {
                    role: Role::Assistant,
                    content: CONNECTION_ERROR_REPLY.to_string(),
                    citations: Vec::new(),
                }
            }
        };
        self.messages.push(reply);
        self.messages.last()
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime settings resolved from command-line flags, falling back to the
//! environment (`API_KEY`/`GEMINI_API_KEY`, `SPENDSMART_MODEL`,
//! `SPENDSMART_API_BASE`, `SPENDSMART_HOME`).

use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let data_dir = match m.get_one::<String>("home") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => crate::db::default_data_dir()?,
        };
        let api_key = resolve_api_key(
            m.get_one::<String>("api_key").map(String::as_str),
            std::env::var("API_KEY").ok().as_deref(),
            std::env::var("GEMINI_API_KEY").ok().as_deref(),
        );
        if api_key.is_none() {
            tracing::warn!(
                "Gemini API key is not set; scan and advise will fail until API_KEY or GEMINI_API_KEY is defined"
            );
        }
        let ai = AiConfig {
            api_key,
            model: m
                .get_one::<String>("model")
                .cloned()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: m
                .get_one::<String>("api_base")
                .cloned()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_secs: m
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Self { data_dir, ai })
    }
}

/// First non-blank of the `--api-key` flag, `API_KEY` and `GEMINI_API_KEY`.
pub fn resolve_api_key(
    flag: Option<&str>,
    api_key_env: Option<&str>,
    gemini_env: Option<&str>,
) -> Option<String> {
    [flag, api_key_env, gemini_env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

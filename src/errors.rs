// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("No API key configured; set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,

    #[error("Request to AI service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response blocked by AI service: {0}")]
    Blocked(String),

    #[error("Could not decode AI service response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("AI service returned text that is not valid JSON: {source}")]
    Parse {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot read document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Could not serialize transaction summary: {0}")]
    Summary(#[from] serde_json::Error),
}

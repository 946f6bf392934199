// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Request/response shapes for the Gemini `generateContent` REST call and a
//! blocking client for it.
//!
//! Callers depend on [`ContentGenerator`] rather than the HTTP client so the
//! ingestion and advisor flows can run against a scripted generator.

use crate::config::AiConfig;
use crate::errors::AiError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: serde_json::Value,
}

impl Tool {
    pub fn web_search() -> Self {
        Self {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<Citation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Convenience for fakes and tests: a single candidate holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part::text(text)],
                }),
                finish_reason: Some("STOP".to_string()),
                grounding_metadata: None,
            }],
            prompt_feedback: None,
        }
    }

    /// Concatenated text parts of the first candidate; empty when there is none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Web sources from grounding metadata, first occurrence of each uri kept.
    pub fn citations(&self) -> Vec<Citation> {
        let mut out: Vec<Citation> = Vec::new();
        let chunks = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|g| g.grounding_chunks.as_slice())
            .unwrap_or_default();
        for web in chunks.iter().filter_map(|c| c.web.as_ref()) {
            if !out.iter().any(|c| c.uri == web.uri) {
                out.push(web.clone());
            }
        }
        out
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

pub trait ContentGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError>;
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for &G {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        (**self).generate(request)
    }
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(AiError::MissingApiKey)?;
        let http = crate::utils::http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

impl ContentGenerator for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        let url = self.endpoint();
        tracing::debug!("POST {}", url);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::error!("AI service returned {}: {}", status, body);
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: GenerateResponse = resp.json().map_err(|e| AiError::Decode(e.to_string()))?;
        if let Some(reason) = parsed.block_reason() {
            return Err(AiError::Blocked(reason.to_string()));
        }
        tracing::debug!("AI service returned {} candidate(s)", parsed.candidates.len());
        Ok(parsed)
    }
}

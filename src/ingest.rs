// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Receipt and statement ingestion.
//!
//! The document is sent to the AI service together with extraction
//! instructions and a response schema. Whatever comes back is treated as
//! untrusted: each record is parsed field by field into [`RawTransaction`] and
//! then normalized into a [`Transaction`] with defaults and an inferred
//! category where the service's one is unusable.

use crate::ai::{Content, ContentGenerator, GenerateRequest, GenerationConfig, Part};
use crate::categorize::{infer_category, needs_inference};
use crate::errors::IngestError;
use crate::models::{Item, Source, Transaction, TransactionType, line_total, new_id};
use base64::Engine as _;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub const UNKNOWN_STORE: &str = "Unknown Store";

pub const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze this document (receipt or bank statement) and extract transaction data.

CRITICAL OCR & PARSING INSTRUCTIONS:
1. Handwriting & Low Quality: Pay close attention to handwritten text, especially for totals or tips. If text is blurry or faded, use context (e.g., sum of items + tax) to infer the correct Total Amount.
2. Multiple Receipts: If the image contains multiple distinct receipts (e.g., side-by-side), split them into separate transaction objects.
3. Accuracy Check: Verify that individual item prices roughly sum up to the total. Prefer the explicitly labeled "Total" or "Grand Total" over subtotals.
4. Date Handling: Look for dates in various formats (MM/DD/YY, DD-Mon-YYYY). Convert strictly to ISO 8601 (YYYY-MM-DD). If year is missing, assume the current year.

Extract the following structured data:
- store: Merchant name (string).
- date: Transaction date (YYYY-MM-DD).
- totalAmount: Final amount paid (number).
- category: Best fit from: [Groceries, Dining, Transport, Utilities, Shopping, Entertainment, Health, Housing, Education, Personal Care, Travel, Subscriptions, Other].
- isRecurring: true if it looks like a subscription, rent, insurance, or utility bill; otherwise false.
- items: Array of line items with:
  - name (string)
  - quantity (number, default 1 if unspecified)
  - unitPrice (number)
  - totalPrice (number)
  - category (optional, same list as above)

Return ONLY a JSON array of objects with this structure. No extra commentary, no markdown, no explanation, just pure JSON."#;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("static regex")
});

/// Schema the service is asked to honour for its reply.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "store": { "type": "STRING" },
                "date": { "type": "STRING" },
                "totalAmount": { "type": "NUMBER" },
                "category": { "type": "STRING" },
                "isRecurring": { "type": "BOOLEAN" },
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "quantity": { "type": "NUMBER" },
                            "unitPrice": { "type": "NUMBER" },
                            "totalPrice": { "type": "NUMBER" },
                            "category": { "type": "STRING" }
                        },
                        "required": ["name", "quantity", "unitPrice", "totalPrice"]
                    }
                }
            },
            "required": ["store", "date", "totalAmount", "items"]
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransaction {
    pub store: Option<String>,
    pub date: Option<String>,
    pub total_amount: Option<Decimal>,
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
    pub items: Vec<RawItem>,
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decimal_from_value(v: Option<&Value>) -> Option<Decimal> {
    match v? {
        Value::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        Value::String(s) => s.trim().trim_start_matches('$').parse::<Decimal>().ok(),
        _ => None,
    }
}

fn bool_from_value(v: Option<&Value>) -> Option<bool> {
    match v? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl RawItem {
    /// `None` when `v` is not an object.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let name = non_empty_str(obj.get("name")).unwrap_or_else(|| "Item".to_string());
        let quantity = decimal_from_value(obj.get("quantity")).unwrap_or(Decimal::ONE);
        let total = decimal_from_value(obj.get("totalPrice"));
        let unit_price = decimal_from_value(obj.get("unitPrice")).unwrap_or_else(|| {
            total
                .and_then(|t| t.checked_div(quantity))
                .unwrap_or(Decimal::ZERO)
        });
        let total_price = match total {
            Some(t) => t,
            None => line_total(quantity, unit_price),
        };
        Some(Self {
            name,
            quantity,
            unit_price,
            total_price,
            category: non_empty_str(obj.get("category")),
        })
    }
}

impl RawTransaction {
    /// `None` when `v` is not an object. Fields of the wrong type are treated as missing.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let items = obj
            .get("items")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(RawItem::from_value).collect())
            .unwrap_or_default();
        Some(Self {
            store: non_empty_str(obj.get("store")),
            date: non_empty_str(obj.get("date")),
            total_amount: match obj.get("totalAmount") {
                Some(Value::Number(_)) => decimal_from_value(obj.get("totalAmount")),
                _ => None,
            },
            category: non_empty_str(obj.get("category")),
            is_recurring: bool_from_value(obj.get("isRecurring")),
            items,
        })
    }
}

fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => text.trim(),
    }
}

/// Parses the service's reply. Empty text is an empty result, a lone object
/// is one record, anything that is not JSON is an error.
pub fn parse_extraction(text: &str) -> Result<Vec<RawTransaction>, IngestError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        tracing::warn!("AI service returned an empty response for the document");
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body).map_err(|source| {
        tracing::error!("Failed to parse JSON from AI service: {}", text);
        IngestError::Parse {
            text: text.to_string(),
            source,
        }
    })?;
    let records = match value {
        Value::Array(arr) => arr,
        other => vec![other],
    };
    let total = records.len();
    let parsed: Vec<RawTransaction> = records
        .iter()
        .filter_map(RawTransaction::from_value)
        .collect();
    if parsed.len() < total {
        tracing::warn!(
            "Dropped {} extracted record(s) that were not objects",
            total - parsed.len()
        );
    }
    Ok(parsed)
}

/// Fills defaults and category for one extracted record.
pub fn normalize(raw: RawTransaction, today: NaiveDate) -> Transaction {
    let category = match raw.category {
        Some(c) if !needs_inference(Some(c.as_str())) => c,
        given => {
            let inferred = infer_category(
                raw.store.as_deref().unwrap_or(""),
                raw.items.iter().map(|i| i.name.as_str()),
            );
            tracing::debug!("Category {:?} replaced by inferred '{}'", given, inferred);
            inferred.to_string()
        }
    };

    let date = match raw.date {
        Some(d) => match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
            Err(_) => {
                tracing::warn!("Extracted date '{}' is not YYYY-MM-DD; using {}", d, today);
                today.to_string()
            }
        },
        None => today.to_string(),
    };

    let items = raw
        .items
        .into_iter()
        .map(|i| Item {
            name: i.name,
            quantity: i.quantity,
            unit_price: i.unit_price,
            total_price: i.total_price,
            category: i.category,
            sub_category: None,
        })
        .collect();

    Transaction {
        id: new_id(),
        date,
        store: raw.store.unwrap_or_else(|| UNKNOWN_STORE.to_string()),
        total_amount: raw.total_amount.unwrap_or(Decimal::ZERO),
        category,
        items,
        tx_type: TransactionType::Expense,
        is_recurring: raw.is_recurring.unwrap_or(false),
        source: Source::Receipt,
        receipt_image: None,
    }
}

pub fn build_request(bytes: &[u8], mime_type: &str) -> GenerateRequest {
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    GenerateRequest {
        contents: vec![Content::user(vec![
            Part::inline(mime_type, data),
            Part::text(EXTRACTION_INSTRUCTIONS),
        ])],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
            temperature: None,
        }),
        tools: Vec::new(),
    }
}

pub struct ReceiptScanner<G> {
    generator: G,
}

impl<G: ContentGenerator> ReceiptScanner<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<Vec<RawTransaction>, IngestError> {
        tracing::info!("Sending {} byte {} document for extraction", bytes.len(), mime_type);
        let request = build_request(bytes, mime_type);
        let response = self.generator.generate(&request)?;
        parse_extraction(&response.text())
    }

    /// All-or-nothing: any failure discards every record of the document.
    pub fn scan(
        &self,
        bytes: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> Result<Vec<Transaction>, IngestError> {
        let raw = self.extract(bytes, mime_type)?;
        let out: Vec<Transaction> = raw.into_iter().map(|r| normalize(r, today)).collect();
        tracing::info!("Extracted {} transaction(s)", out.len());
        Ok(out)
    }
}

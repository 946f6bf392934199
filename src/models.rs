// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending buckets in declaration order. Order is significant for keyword
/// inference, see [`crate::categorize`].
pub const SUGGESTED_CATEGORIES: [&str; 13] = [
    "Groceries",
    "Dining",
    "Transport",
    "Utilities",
    "Shopping",
    "Entertainment",
    "Health",
    "Housing",
    "Education",
    "Personal Care",
    "Travel",
    "Subscriptions",
    "Other",
];

pub const OTHER_CATEGORY: &str = "Other";

pub fn sub_categories(category: &str) -> &'static [&'static str] {
    match category {
        "Groceries" => &[
            "Produce",
            "Dairy & Eggs",
            "Meat & Seafood",
            "Bakery",
            "Pantry",
            "Frozen Foods",
            "Beverages",
            "Snacks",
            "Household",
        ],
        "Dining" => &["Fast Food", "Restaurants", "Coffee & Tea", "Bars", "Delivery"],
        "Transport" => &[
            "Fuel",
            "Public Transit",
            "Rideshare",
            "Parking",
            "Maintenance",
            "Air Travel",
            "Car Rental",
        ],
        "Utilities" => &["Electricity", "Water", "Gas", "Internet", "Phone", "Trash"],
        "Shopping" => &[
            "Clothing",
            "Shoes",
            "Electronics",
            "Home & Garden",
            "Beauty",
            "Sports",
            "Books",
            "Gifts",
        ],
        "Entertainment" => &["Movies", "Events", "Streaming", "Games", "Hobbies"],
        "Health" => &["Doctors", "Pharmacy", "Fitness", "Therapy", "Dental"],
        "Housing" => &["Rent", "Mortgage", "Repairs", "Furniture", "Decor", "Services"],
        "Education" => &["Tuition", "Textbooks", "Courses", "Supplies"],
        "Personal Care" => &["Hair", "Spa", "Nails", "Cosmetics"],
        "Travel" => &["Hotels", "Flights", "Tours", "Transport"],
        "Subscriptions" => &["Streaming Video", "Music", "Software", "Memberships"],
        "Other" => &["Charity", "Taxes", "Fees", "Miscellaneous"],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
        }
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXPENSE" => Ok(Self::Expense),
            "INCOME" => Ok(Self::Income),
            other => Err(anyhow!("Invalid transaction type '{}', expected expense|income", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    Receipt,
    Statement,
    #[default]
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "RECEIPT",
            Self::Statement => "STATEMENT",
            Self::Manual => "MANUAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(default = "default_quantity", with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// `quantity * unit_price`, or zero when the product does not fit a `Decimal`.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity.checked_mul(unit_price).unwrap_or_else(|| {
        tracing::warn!("Line total {} x {} overflows; using 0", quantity, unit_price);
        Decimal::ZERO
    })
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            total_price: line_total(quantity, unit_price),
            category: None,
            sub_category: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// ISO `YYYY-MM-DD`; kept as text so foreign values survive a round trip.
    pub date: String,
    pub store: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(rename = "type", default)]
    pub tx_type: TransactionType,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image: Option<String>,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Transaction {
    pub fn new_manual(
        date: impl Into<String>,
        store: impl Into<String>,
        total_amount: Decimal,
        category: impl Into<String>,
        tx_type: TransactionType,
        is_recurring: bool,
    ) -> Self {
        Self {
            id: new_id(),
            date: date.into(),
            store: store.into(),
            total_amount,
            category: category.into(),
            items: Vec::new(),
            tx_type,
            is_recurring,
            source: Source::Manual,
            receipt_image: None,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    /// First seven characters of the date, i.e. `YYYY-MM`.
    pub fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Appends a placeholder line item inheriting the transaction's category.
    pub fn add_item(&mut self) -> &mut Item {
        let category = if self.category.is_empty() {
            OTHER_CATEGORY.to_string()
        } else {
            self.category.clone()
        };
        self.items.push(Item {
            name: "New Item".to_string(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
            category: Some(category),
            sub_category: None,
        });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item> {
        if index >= self.items.len() {
            return Err(anyhow!(
                "Item {} out of range ({} items on {})",
                index,
                self.items.len(),
                self.id
            ));
        }
        Ok(self.items.remove(index))
    }

    pub fn item_mut(&mut self, index: usize) -> Result<&mut Item> {
        let len = self.items.len();
        let id = self.id.clone();
        self.items
            .get_mut(index)
            .ok_or_else(|| anyhow!("Item {} out of range ({} items on {})", index, len, id))
    }

    pub fn set_item_quantity(&mut self, index: usize, quantity: Decimal) -> Result<()> {
        let item = self.item_mut(index)?;
        item.quantity = quantity;
        item.total_price = line_total(item.quantity, item.unit_price);
        Ok(())
    }

    pub fn set_item_unit_price(&mut self, index: usize, unit_price: Decimal) -> Result<()> {
        let item = self.item_mut(index)?;
        item.unit_price = unit_price;
        item.total_price = line_total(item.quantity, item.unit_price);
        Ok(())
    }

    /// Overwrites the stored total with the sum of line-item totals.
    pub fn recalculate_total(&mut self) -> Decimal {
        self.total_amount = self.items_total();
        self.total_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(anyhow!("Invalid theme '{}', expected light|dark", other)),
        }
    }
}

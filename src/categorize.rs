// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{OTHER_CATEGORY, SUGGESTED_CATEGORIES};

/// Keyword table scanned top to bottom; the first category with any keyword
/// contained in the search text wins. Several keywords appear under more than
/// one category ("gas", "ticket", "book"), so this order decides them.
pub static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Groceries",
        &[
            "grocery", "market", "food", "supermarket", "mart", "produce", "fruit", "vegetable",
            "meat", "milk", "egg", "bread", "bakery", "kroger", "walmart", "whole foods",
            "trader joe", "safeway", "publix", "aldi", "lidl", "wegmans", "tesco", "sainsbury",
        ],
    ),
    (
        "Dining",
        &[
            "restaurant", "cafe", "coffee", "starbucks", "diner", "bistro", "grill", "bar",
            "pizza", "burger", "mcdonald", "kfc", "taco", "chipotle", "subway", "eatery",
            "kitchen", "steakhouse", "baker", "dunkin", "domino", "wendy",
        ],
    ),
    (
        "Transport",
        &[
            "fuel", "gas", "petrol", "shell", "bp", "chevron", "exxon", "uber", "lyft", "taxi",
            "train", "bus", "metro", "transit", "airline", "flight", "parking", "automotive",
            "car wash", "ticket", "transport",
        ],
    ),
    (
        "Utilities",
        &[
            "electric", "water", "power", "energy", "gas", "internet", "wifi", "broadband",
            "cable", "phone", "mobile", "at&t", "verizon", "t-mobile", "comcast", "xfinity",
            "bill", "sewer", "trash", "waste",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "target", "costco", "best buy", "apple", "clothing", "apparel", "shoe",
            "fashion", "mall", "retail", "shop", "store", "electronics", "home depot", "lowe",
            "ikea", "book", "gift",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "cinema", "theater", "theatre", "netflix", "spotify", "hulu", "disney",
            "game", "nintendo", "steam", "playstation", "xbox", "concert", "ticket", "event",
            "museum", "bowling", "amusement",
        ],
    ),
    (
        "Health",
        &[
            "pharmacy", "drug", "cvs", "walgreens", "rite aid", "doctor", "physician",
            "hospital", "clinic", "dental", "dentist", "medical", "health", "vitamin",
            "supplement", "gym", "fitness", "workout", "yoga",
        ],
    ),
    (
        "Housing",
        &[
            "rent", "mortgage", "apartment", "housing", "maintenance", "repair", "plumber",
            "contractor", "furniture", "decor", "lease",
        ],
    ),
    (
        "Education",
        &[
            "school", "university", "college", "tuition", "book", "course", "class", "training",
            "udemy", "coursera", "student",
        ],
    ),
    (
        "Personal Care",
        &[
            "hair", "salon", "barber", "spa", "nail", "beauty", "cosmetic", "lotion", "shampoo",
            "soap", "grooming",
        ],
    ),
    (
        "Travel",
        &[
            "hotel", "motel", "airbnb", "resort", "booking", "expedia", "trip", "vacation",
            "luggage", "tour",
        ],
    ),
    (
        "Subscriptions",
        &[
            "subscription", "sub", "monthly", "yearly", "renewal", "membership", "prime",
            "premium",
        ],
    ),
];

/// Best-guess category for a store and its line items, `"Other"` when nothing matches.
pub fn infer_category<I, S>(store: &str, item_names: I) -> &'static str
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<S> = item_names.into_iter().collect();
    let joined = names.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ");
    let hay = format!("{} {}", store, joined).to_lowercase();

    for (category, terms) in CATEGORY_KEYWORDS {
        if let Some(term) = terms.iter().find(|t| hay.contains(**t)) {
            tracing::trace!("Inferred '{}' from keyword '{}'", category, term);
            return *category;
        }
    }
    OTHER_CATEGORY
}

pub fn is_known_category(name: &str) -> bool {
    SUGGESTED_CATEGORIES.contains(&name)
}

/// True when a service-provided category cannot be used as is.
pub fn needs_inference(category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(c) => c.is_empty() || c == "Uncategorized" || !is_known_category(c),
    }
}

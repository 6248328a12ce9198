//! Static configuration tables.
//!
//! The category registry and the range default are configuration-as-data:
//! constant tables read at startup, never mutated. The registry mirrors the
//! sheet layout of the upstream crawler that produces the JSON files.

use crate::domain::{Category, RangeToken};

/// The fixed category registry, in tab display order.
pub static CATEGORIES: [Category; 5] = [
    Category {
        key: "Inflation",
        label: "Inflation",
        file: "Inflation.json",
    },
    Category {
        key: "Labor",
        label: "Labor",
        file: "Labor.json",
    },
    Category {
        key: "Rates",
        label: "Rates",
        file: "Rates.json",
    },
    Category {
        key: "Policy",
        label: "Policy",
        file: "Policy.json",
    },
    Category {
        key: "Financial_Conditions",
        label: "Financial Conditions",
        file: "Financial_Conditions.json",
    },
];

/// Range applied on initial load.
pub const DEFAULT_RANGE: RangeToken = RangeToken::Y1;

/// Look up a category by its registry key (case-insensitive).
pub fn category_by_key(key: &str) -> Option<&'static Category> {
    CATEGORIES
        .iter()
        .find(|c| c.key.eq_ignore_ascii_case(key.trim()))
}

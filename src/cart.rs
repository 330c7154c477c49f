// src/cart.rs

//! Shopping list aggregation
//!
//! A user's cart is a set of recipes. Flattening it yields one
//! [`CartEntry`] per (recipe, ingredient) line; [`aggregate`] folds those
//! into a single list with one [`PurchaseLine`] per ingredient name and
//! measurement unit, amounts summed.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Suggested file name for the downloadable list
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

const HEADER: &str = "Shopping list:";
const EMPTY_MESSAGE: &str = "Your shopping list is empty.";

/// One ingredient line of one recipe in a cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// What to buy: an ingredient, its unit and the total amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

/// Deduplicated purchase lines, ordered by name then unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    lines: Vec<PurchaseLine>,
}

/// Fold cart entries into a shopping list
///
/// Entries sharing name and unit collapse into one line. The same name under
/// a different unit stays a separate line. Non-positive amounts contribute
/// nothing.
pub fn aggregate<I>(entries: I) -> ShoppingList
where
    I: IntoIterator<Item = CartEntry>,
{
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();

    for entry in entries {
        let Ok(amount) = u64::try_from(entry.amount) else {
            continue;
        };
        if amount == 0 {
            continue;
        }

        let total = totals
            .entry((entry.name, entry.measurement_unit))
            .or_default();
        *total = total.saturating_add(amount);
    }

    let lines = totals
        .into_iter()
        .map(|((name, measurement_unit), amount)| PurchaseLine {
            name,
            measurement_unit,
            amount,
        })
        .collect();

    ShoppingList { lines }
}

impl ShoppingList {
    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Plain-text rendering, one numbered line per purchase
    pub fn render_text(&self) -> String {
        if self.lines.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }

        let mut out = String::from(HEADER);
        for (index, line) in self.lines.iter().enumerate() {
            // Writing into a String cannot fail
            let _ = write!(
                out,
                "\n{}. {} - {} {}.",
                index + 1,
                line.name,
                line.amount,
                line.measurement_unit
            );
        }
        out
    }
}

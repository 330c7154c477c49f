// src/db/models/shopping_cart.rs

//! Reading a user's cart back out as a shopping list

use crate::cart::{self, CartEntry, ShoppingList};
use crate::error::Result;
use rusqlite::Connection;

/// Every ingredient line of every recipe in `user_id`'s cart
pub fn cart_entries(conn: &Connection, user_id: i64) -> Result<Vec<CartEntry>> {
    let mut stmt = conn.prepare(
        "SELECT sc.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
         FROM shopping_cart sc
         JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE sc.user_id = ?1
         ORDER BY sc.id, ri.id",
    )?;

    let entries = stmt
        .query_map([user_id], |row| {
            Ok(CartEntry {
                recipe_id: row.get(0)?,
                ingredient_id: row.get(1)?,
                name: row.get(2)?,
                measurement_unit: row.get(3)?,
                amount: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(entries)
}

/// The aggregated shopping list for `user_id`
pub fn shopping_list(conn: &Connection, user_id: i64) -> Result<ShoppingList> {
    Ok(cart::aggregate(cart_entries(conn, user_id)?))
}

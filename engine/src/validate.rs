//! Shape validation and recovery for persisted collections.
//!
//! Persisted state is untrusted: it may have been written by an older
//! app version, edited by hand, or truncated by the platform. The
//! recovery engine never fails - it returns a best-effort valid
//! collection (possibly empty) plus diagnostics, so a corrupted entry
//! can never block startup.
//!
//! # Rules
//!
//! Favorites: the top-level value must be an object mapping non-empty
//! category names to arrays. A category whose value is not an array is
//! dropped. A recipe entry survives only with a non-empty string
//! `recipeName` and an `ingredients` array of strings; a malformed
//! `dateAdded` is stripped rather than dropping the entry.
//!
//! Shopping list: the top-level value must be an array. An element
//! survives only as an object with a non-empty string `text`; a missing
//! or malformed `checked` defaults to false.
//!
//! Recovery is idempotent: running it over its own output drops nothing.

use crate::item::ShoppingItem;
use crate::recipe::Recipe;
use crate::{Favorites, ShoppingList};
use serde_json::Value;

/// Outcome of running recovery over a raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery<T> {
    /// Best-effort valid collection
    pub value: T,
    /// Number of entries discarded during recovery
    pub dropped: usize,
    /// True when the top-level value had the wrong shape entirely and
    /// the collection was reset to empty
    pub reset: bool,
}

impl<T> Recovery<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            dropped: 0,
            reset: false,
        }
    }

    fn full_reset(value: T) -> Self {
        Self {
            value,
            dropped: 0,
            reset: true,
        }
    }

    /// True when nothing was discarded or reset.
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && !self.reset
    }

    /// Human-readable recovery note, `None` when nothing was discarded.
    ///
    /// `noun` names the entries, e.g. "favorite" or "shopping list".
    pub fn note(&self, noun: &str) -> Option<String> {
        if self.reset {
            Some(format!("stored {noun} data was unreadable and has been reset"))
        } else if self.dropped == 1 {
            Some(format!("removed 1 invalid {noun} entry"))
        } else if self.dropped > 1 {
            Some(format!("removed {} invalid {noun} entries", self.dropped))
        } else {
            None
        }
    }
}

/// Recover a favorites collection from a raw JSON value.
pub fn recover_favorites(raw: &Value) -> Recovery<Favorites> {
    let Some(categories) = raw.as_object() else {
        return Recovery::full_reset(Favorites::new());
    };

    let mut recovery = Recovery::clean(Favorites::new());
    for (category, entries) in categories {
        if category.trim().is_empty() {
            recovery.dropped += 1;
            continue;
        }
        let Some(entries) = entries.as_array() else {
            recovery.dropped += 1;
            continue;
        };

        let mut recipes = Vec::with_capacity(entries.len());
        for entry in entries {
            match recover_recipe(entry) {
                Some(recipe) => recipes.push(recipe),
                None => recovery.dropped += 1,
            }
        }
        // A category emptied by recovery is kept; empty categories are
        // legal transient state and removal is an explicit user action.
        recovery.value.insert(category.clone(), recipes);
    }
    recovery
}

fn recover_recipe(entry: &Value) -> Option<Recipe> {
    let obj = entry.as_object()?;

    let name = obj.get("recipeName")?.as_str()?;
    if name.trim().is_empty() {
        return None;
    }

    let ingredients = obj.get("ingredients")?.as_array()?;
    let mut lines = Vec::with_capacity(ingredients.len());
    for line in ingredients {
        lines.push(line.as_str()?.to_string());
    }

    // Malformed timestamps are stripped, not fatal: the entry is user
    // data, the timestamp is metadata.
    let date_added = obj.get("dateAdded").and_then(Value::as_u64);

    Some(Recipe {
        recipe_name: name.to_string(),
        ingredients: lines,
        date_added,
    })
}

/// Recover a shopping list from a raw JSON value.
pub fn recover_shopping_list(raw: &Value) -> Recovery<ShoppingList> {
    let Some(entries) = raw.as_array() else {
        return Recovery::full_reset(ShoppingList::new());
    };

    let mut recovery = Recovery::clean(ShoppingList::with_capacity(entries.len()));
    for entry in entries {
        match recover_item(entry) {
            Some(item) => recovery.value.push(item),
            None => recovery.dropped += 1,
        }
    }
    recovery
}

fn recover_item(entry: &Value) -> Option<ShoppingItem> {
    let obj = entry.as_object()?;

    let text = obj.get("text")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }

    let checked = obj.get("checked").and_then(Value::as_bool).unwrap_or(false);

    Some(ShoppingItem {
        text: text.to_string(),
        checked,
    })
}

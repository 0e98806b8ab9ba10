//! Merge engine for imported backups.
//!
//! Given two validated collections - the current state and an imported
//! one - the merge produces a combined collection with duplicates
//! eliminated and a count of net-new entries.
//!
//! # Conflict policy
//!
//! Existing data wins on an identity conflict: an import can add entries
//! but never overwrites a local edit. Merging is deterministic and
//! idempotent - importing the same backup twice yields the identical
//! collection and a second-round new count of zero.

use crate::item::ShoppingItem;
use crate::{Favorites, ShoppingList};
use std::collections::HashSet;

/// Result of merging an imported collection into an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome<T> {
    /// Combined collection
    pub merged: T,
    /// Number of net-new entries contributed by the import
    pub new_count: usize,
}

/// Merge imported favorites into the existing collection.
///
/// The output holds the union of categories. Within a category, an
/// imported recipe is appended only when no existing recipe matches its
/// name (compared case-insensitively); matches keep the existing entry.
pub fn merge_favorites(existing: Favorites, imported: &Favorites) -> MergeOutcome<Favorites> {
    let mut merged = existing;
    let mut new_count = 0;

    for (category, recipes) in imported {
        let target = merged.entry(category.clone()).or_default();
        for recipe in recipes {
            let key = recipe.name_key();
            if target.iter().any(|r| r.name_key() == key) {
                continue;
            }
            target.push(recipe.clone());
            new_count += 1;
        }
    }

    MergeOutcome { merged, new_count }
}

/// Merge an imported shopping list into the existing one.
///
/// Existing order is preserved; imported items whose normalized text is
/// not already present are appended in their imported relative order.
/// `checked` state never participates in matching.
pub fn merge_shopping_list(
    existing: ShoppingList,
    imported: &[ShoppingItem],
) -> MergeOutcome<ShoppingList> {
    let mut merged = existing;
    let mut seen: HashSet<String> = merged.iter().map(|item| item.text_key()).collect();
    let mut new_count = 0;

    for item in imported {
        let key = item.text_key();
        if seen.contains(&key) {
            continue;
        }
        seen.insert(key);
        merged.push(item.clone());
        new_count += 1;
    }

    MergeOutcome { merged, new_count }
}

//! Recipe records stored in the favorites collection.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// A saved recipe.
///
/// `recipe_name` is the identity key within a category. Duplicate
/// detection compares names through [`Recipe::name_key`]; the stored
/// name keeps its original casing and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Display name, unique within a category
    pub recipe_name: String,
    /// Ordered ingredient lines
    pub ingredients: Vec<String>,
    /// Set once, at the moment the recipe is added to favorites.
    /// Absent on a freshly generated recipe that was never favorited,
    /// and on legacy persisted entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<Timestamp>,
}

impl Recipe {
    /// Create a recipe that has not been favorited yet.
    pub fn new(recipe_name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            recipe_name: recipe_name.into(),
            ingredients,
            date_added: None,
        }
    }

    /// Derived comparison key for duplicate detection.
    pub fn name_key(&self) -> String {
        name_key(&self.recipe_name)
    }
}

/// Normalize a recipe name for comparison: trimmed and lower-cased.
/// Never written back to the stored value.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

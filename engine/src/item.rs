//! Shopping list items.

use serde::{Deserialize, Serialize};

/// A single purchasable entry on the shopping list.
///
/// Identity for dedup and merge purposes is the normalized text (see
/// [`ShoppingItem::text_key`]); `checked` never participates in
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    /// Item description as entered by the user
    pub text: String,
    /// Whether the item has been checked off
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingItem {
    /// Create an unchecked item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }

    /// Derived comparison key for duplicate detection.
    pub fn text_key(&self) -> String {
        text_key(&self.text)
    }
}

/// Normalize item text for comparison: trimmed and lower-cased.
/// Never written back to the stored value.
pub(crate) fn text_key(text: &str) -> String {
    text.trim().to_lowercase()
}

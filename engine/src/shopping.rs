//! Shopping list store: an ordered list of purchasable items.
//!
//! Structurally the twin of the favorites store: load/save against an
//! injected [`Storage`], complete read-modify-write mutations, snapshot
//! semantics on every return value. Order is meaningful here - the user
//! controls it by dragging - and survives persistence round-trips.

use crate::codec;
use crate::error::{Error, Result};
use crate::item::{self, ShoppingItem};
use crate::merge;
use crate::storage::Storage;
use crate::validate;
use crate::{Imported, Loaded, ShoppingList};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default storage key for the shopping list.
pub const SHOPPING_LIST_KEY: &str = "shoppingList";

/// What recovery notes call shopping list entries.
const NOUN: &str = "shopping list";

/// Store for the shopping list.
#[derive(Debug)]
pub struct ShoppingListStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> ShoppingListStore<S> {
    /// Create a store over the given storage, using [`SHOPPING_LIST_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SHOPPING_LIST_KEY)
    }

    /// Create a store bound to a custom storage key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Load the persisted list.
    ///
    /// An absent entry yields an empty list with no note. A corrupted
    /// entry is recovered, immediately re-persisted so the repair
    /// happens exactly once, and described through the note.
    pub fn load(&mut self) -> Result<Loaded<ShoppingList>> {
        let raw = self
            .storage
            .get(&self.key)
            .map_err(|source| Error::storage(&self.key, source))?;
        let Some(text) = raw else {
            return Ok(Loaded {
                collection: ShoppingList::new(),
                note: None,
            });
        };

        let parsed = codec::parse(&text).unwrap_or(Value::Null);
        let recovery = validate::recover_shopping_list(&parsed);
        let note = recovery.note(NOUN);
        if !recovery.is_clean() {
            warn!(
                key = %self.key,
                dropped = recovery.dropped,
                reset = recovery.reset,
                "recovered corrupted shopping list data"
            );
            self.save(&recovery.value)?;
        }

        Ok(Loaded {
            collection: recovery.value,
            note,
        })
    }

    /// Persist the full list under the store's key.
    ///
    /// Always a full overwrite, never a partial patch.
    pub fn save(&mut self, list: &ShoppingList) -> Result<()> {
        let text = codec::encode(list)?;
        self.storage
            .set(&self.key, &text)
            .map_err(|source| Error::storage(&self.key, source))?;
        debug!(key = %self.key, items = list.len(), "saved shopping list");
        Ok(())
    }

    /// Append new items to the end of the list.
    ///
    /// Each input is trimmed; empty strings and texts already on the
    /// list (compared trimmed and case-insensitively) are skipped. The
    /// rest are appended unchecked, in input order.
    pub fn add_items<I, T>(&mut self, texts: I) -> Result<ShoppingList>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut list = self.load()?.collection;
        let mut seen: HashSet<String> = list.iter().map(|item| item.text_key()).collect();

        for text in texts {
            let trimmed = text.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = item::text_key(trimmed);
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key);
            list.push(ShoppingItem::new(trimmed));
        }

        self.save(&list)?;
        Ok(list)
    }

    /// Replace the element at `index` wholesale.
    ///
    /// Used for both text edits and checked-toggling. An out-of-range
    /// index returns the list unchanged - a guard against UI/state
    /// races, not a reported error.
    pub fn update_item(&mut self, index: usize, item: ShoppingItem) -> Result<ShoppingList> {
        let mut list = self.load()?.collection;
        if index >= list.len() {
            return Ok(list);
        }

        list[index] = item;
        self.save(&list)?;
        Ok(list)
    }

    /// Remove the element at `index`. Out-of-range is a no-op.
    pub fn remove_item(&mut self, index: usize) -> Result<ShoppingList> {
        let mut list = self.load()?.collection;
        if index >= list.len() {
            return Ok(list);
        }

        list.remove(index);
        self.save(&list)?;
        Ok(list)
    }

    /// Remove every checked item, preserving the relative order of the
    /// rest.
    pub fn clear_checked(&mut self) -> Result<ShoppingList> {
        let mut list = self.load()?.collection;
        list.retain(|item| !item.checked);
        self.save(&list)?;
        Ok(list)
    }

    /// Empty the list.
    pub fn clear_all(&mut self) -> Result<ShoppingList> {
        let list = ShoppingList::new();
        self.save(&list)?;
        Ok(list)
    }

    /// Replace the full sequence with a caller-supplied one.
    ///
    /// This is the drag-reorder path: the caller is trusted to supply a
    /// permutation of the current elements, so no validation happens
    /// here - the input comes from a single-user drag gesture, not from
    /// imported data.
    pub fn replace_all(&mut self, items: ShoppingList) -> Result<ShoppingList> {
        self.save(&items)?;
        Ok(items)
    }

    /// Import a raw shopping list payload from a backup.
    ///
    /// The payload is validated first, then merged into the current list
    /// (new items append at the end in imported order), and the result
    /// is persisted.
    pub fn import(&mut self, raw: &Value) -> Result<Imported<ShoppingList>> {
        let recovery = validate::recover_shopping_list(raw);
        let existing = self.load()?.collection;

        let outcome = merge::merge_shopping_list(existing, &recovery.value);
        self.save(&outcome.merged)?;

        Ok(Imported {
            collection: outcome.merged,
            new_count: outcome.new_count,
            note: recovery.note(NOUN),
        })
    }

    /// Raw persisted text currently stored under the store's key.
    ///
    /// Intended for hosts that mirror the engine's canonical text into
    /// their own durable storage.
    pub fn persisted(&self) -> Result<Option<String>> {
        self.storage
            .get(&self.key)
            .map_err(|source| Error::storage(&self.key, source))
    }
}

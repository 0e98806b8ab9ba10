//! Favorites store: recipes grouped into user-defined categories.
//!
//! The store owns load/save for the favorites collection against an
//! injected [`Storage`]. Every mutating operation is a complete
//! read-modify-write: load the current collection, apply the change,
//! persist the full collection, return the new snapshot. Callers treat
//! returned collections as immutable snapshots - a fresh copy comes back
//! from every call, nothing is mutated under a previous one.

use crate::codec;
use crate::error::{Error, Result};
use crate::merge;
use crate::recipe::{self, Recipe};
use crate::storage::Storage;
use crate::validate;
use crate::{Favorites, Imported, Loaded, Timestamp};
use serde_json::Value;
use tracing::{debug, warn};

/// Default storage key for the favorites collection.
pub const FAVORITES_KEY: &str = "favorites";

/// What recovery notes call favorites entries.
const NOUN: &str = "favorite";

/// Store for the favorites collection.
#[derive(Debug)]
pub struct FavoritesStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> FavoritesStore<S> {
    /// Create a store over the given storage, using [`FAVORITES_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    /// Create a store bound to a custom storage key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Load the persisted collection.
    ///
    /// An absent entry yields an empty collection with no note. A
    /// corrupted entry is recovered, immediately re-persisted so the
    /// repair happens exactly once, and described through the note.
    pub fn load(&mut self) -> Result<Loaded<Favorites>> {
        let raw = self
            .storage
            .get(&self.key)
            .map_err(|source| Error::storage(&self.key, source))?;
        let Some(text) = raw else {
            return Ok(Loaded {
                collection: Favorites::new(),
                note: None,
            });
        };

        let parsed = codec::parse(&text).unwrap_or(Value::Null);
        let recovery = validate::recover_favorites(&parsed);
        let note = recovery.note(NOUN);
        if !recovery.is_clean() {
            warn!(
                key = %self.key,
                dropped = recovery.dropped,
                reset = recovery.reset,
                "recovered corrupted favorites data"
            );
            self.save(&recovery.value)?;
        }

        Ok(Loaded {
            collection: recovery.value,
            note,
        })
    }

    /// Persist the full collection under the store's key.
    ///
    /// Always a full overwrite, never a partial patch: the collection is
    /// serialized to a complete string first and written once.
    pub fn save(&mut self, favorites: &Favorites) -> Result<()> {
        let text = codec::encode(favorites)?;
        self.storage
            .set(&self.key, &text)
            .map_err(|source| Error::storage(&self.key, source))?;
        debug!(key = %self.key, categories = favorites.len(), "saved favorites");
        Ok(())
    }

    /// Add a recipe to a category, stamping `date_added` with `now`.
    ///
    /// The category is created if absent. If a recipe with the same name
    /// (compared case-insensitively) already exists in the category, the
    /// existing entry is replaced in place rather than duplicated.
    pub fn add_recipe(
        &mut self,
        recipe: Recipe,
        category: &str,
        now: Timestamp,
    ) -> Result<Favorites> {
        let mut favorites = self.load()?.collection;

        let mut recipe = recipe;
        recipe.date_added = Some(now);
        let key = recipe.name_key();

        let entries = favorites.entry(category.to_string()).or_default();
        match entries.iter().position(|r| r.name_key() == key) {
            Some(pos) => entries[pos] = recipe,
            None => entries.push(recipe),
        }

        self.save(&favorites)?;
        Ok(favorites)
    }

    /// Remove the first recipe in `category` whose name matches
    /// case-insensitively. If the category becomes empty it is removed
    /// entirely. Unknown names and categories are silent no-ops.
    pub fn remove_recipe(&mut self, name: &str, category: &str) -> Result<Favorites> {
        let mut favorites = self.load()?.collection;

        if let Some(entries) = favorites.get_mut(category) {
            let key = recipe::name_key(name);
            if let Some(pos) = entries.iter().position(|r| r.name_key() == key) {
                entries.remove(pos);
            }
            if entries.is_empty() {
                favorites.remove(category);
            }
        }

        self.save(&favorites)?;
        Ok(favorites)
    }

    /// Delete a category and all its recipes. Unknown categories are a
    /// silent no-op.
    pub fn remove_category(&mut self, category: &str) -> Result<Favorites> {
        let mut favorites = self.load()?.collection;
        favorites.remove(category);
        self.save(&favorites)?;
        Ok(favorites)
    }

    /// Import a raw favorites payload from a backup.
    ///
    /// The payload is validated first, then merged into the current
    /// collection (existing entries win on name conflicts), and the
    /// result is persisted.
    pub fn import(&mut self, raw: &Value) -> Result<Imported<Favorites>> {
        let recovery = validate::recover_favorites(raw);
        let existing = self.load()?.collection;

        let outcome = merge::merge_favorites(existing, &recovery.value);
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

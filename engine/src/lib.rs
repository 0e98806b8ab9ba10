//! # Larder Engine
//!
//! The local collection engine behind the Larder recipe assistant.
//!
//! Two persisted collections back the app: **Favorites** (recipes
//! grouped into user-defined categories) and the **Shopping List** (an
//! ordered list of purchasable items). Both are served by structurally
//! identical stores that guarantee two things: whatever is read from or
//! written to persistent storage is well-formed, and merging an imported
//! backup never loses or duplicates user data.
//!
//! ## Design Principles
//!
//! - **Storage-agnostic**: the engine is handed a synchronous key-value
//!   [`Storage`] and knows nothing about files, platforms, or networks
//!   beyond that seam
//! - **Never block on bad data**: corrupted persisted state is recovered
//!   best-effort and reported through a note, not an error
//! - **Deterministic**: recovery and merging are pure - the same inputs
//!   always produce the same outputs
//! - **Snapshot semantics**: every store call returns a fresh full copy;
//!   nothing a caller holds is ever mutated in place
//!
//! ## Core Concepts
//!
//! ### Stores
//!
//! [`FavoritesStore`] and [`ShoppingListStore`] own load/save for their
//! collection. Every mutation is a complete read-modify-write executed
//! to completion before returning; the application's single-threaded
//! execution model serializes callers, so there is no locking.
//!
//! ### Recovery
//!
//! Loads run the persisted value through the [`validate`] engine, which
//! drops malformed entries, repairs what it can, and reports what it
//! discarded. A corrupted entry is re-persisted in repaired form exactly
//! once.
//!
//! ### Merge
//!
//! Importing a [`BackupData`] payload validates each part, then merges
//! it into the current state. Existing data wins on identity conflicts;
//! merges are deterministic and idempotent.
//!
//! ## Quick Start
//!
//! ```rust
//! use larder_engine::{FavoritesStore, MemoryStorage, Recipe};
//!
//! let mut store = FavoritesStore::new(MemoryStorage::new());
//!
//! let recipe = Recipe::new("Minestrone", vec!["beans".into(), "pasta".into()]);
//! let favorites = store.add_recipe(recipe, "Soups", 1706745600000).unwrap();
//! assert_eq!(favorites["Soups"].len(), 1);
//!
//! let loaded = store.load().unwrap();
//! assert!(loaded.note.is_none());
//! assert_eq!(loaded.collection, favorites);
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for use from other
//! languages (Dart/Flutter, Swift, Kotlin, etc.). All data is exchanged
//! as JSON strings; the host owns durable storage.

pub mod backup;
pub mod codec;
pub mod error;
pub mod favorites;
pub mod ffi;
pub mod item;
pub mod merge;
pub mod recipe;
pub mod shopping;
pub mod storage;
pub mod validate;

// Re-export main types at crate root
pub use backup::BackupData;
pub use error::{Error, Result};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use item::ShoppingItem;
pub use merge::{merge_favorites, merge_shopping_list, MergeOutcome};
pub use recipe::Recipe;
pub use shopping::{ShoppingListStore, SHOPPING_LIST_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use validate::{recover_favorites, recover_shopping_list, Recovery};

/// Type aliases for clarity
pub type CategoryName = String;
pub type Timestamp = u64;

/// The favorites collection: categories mapped to ordered recipe
/// sequences. `BTreeMap` keeps the persisted form deterministic.
pub type Favorites = std::collections::BTreeMap<CategoryName, Vec<Recipe>>;

/// The shopping list: an ordered sequence whose order is user-controlled.
pub type ShoppingList = Vec<ShoppingItem>;

/// A loaded collection plus an optional recovery note.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loaded<T> {
    /// The collection read from storage (possibly recovered)
    pub collection: T,
    /// Human-readable description of what recovery discarded, if anything
    pub note: Option<String>,
}

/// Result of importing one part of a backup.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Imported<T> {
    /// Merged collection after the import was applied and saved
    pub collection: T,
    /// Net-new entries contributed by the import
    pub new_count: usize,
    /// Recovery note from validating the imported payload
    pub note: Option<String>,
}

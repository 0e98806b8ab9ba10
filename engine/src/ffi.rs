//! FFI layer for host applications.
//!
//! This module provides C-compatible functions that can be called from
//! Dart, Swift, Kotlin or a JS runtime. All data crosses the boundary as
//! JSON strings.
//!
//! # Persistence Model
//!
//! The host owns durable storage. `larder_stores_new` seeds the engine
//! with whatever persisted text the host has (null for a fresh install).
//! After a mutation, the host reads the canonical persisted text back
//! with `larder_favorites_state` / `larder_shopping_state` and writes it
//! to its own storage.
//!
//! # Memory Management
//!
//! - Strings returned by `larder_*` functions are allocated by Rust
//! - Caller must free them with `larder_string_free`
//! - Store pointers must be freed with `larder_stores_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure

use crate::backup::BackupData;
use crate::favorites::FavoritesStore;
use crate::item::ShoppingItem;
use crate::recipe::Recipe;
use crate::shopping::ShoppingListStore;
use crate::storage::{MemoryStorage, Storage};
use crate::{Timestamp, FAVORITES_KEY, SHOPPING_LIST_KEY};
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

/// Summary returned by `larder_import_backup`.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportSummary {
    new_recipes: usize,
    new_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorites_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopping_note: Option<String>,
}

/// Both stores, held behind one opaque handle.
pub struct Stores {
    favorites: FavoritesStore<MemoryStorage>,
    shopping: ShoppingListStore<MemoryStorage>,
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `larder_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // String contained null bytes - return error JSON
            let error = CString::new(r#"{"error":"string contained null bytes"}"#).unwrap();
            error.into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

// ============================================================================
// Store Lifecycle
// ============================================================================

/// Open both stores, seeded with the host's persisted text.
///
/// # Arguments
/// - `favorites_text`: persisted favorites JSON, or null for none
/// - `shopping_text`: persisted shopping list JSON, or null for none
///
/// # Returns
/// Pointer to the stores handle. Corrupted text is not rejected here; it
/// is handled by recovery on the first load.
///
/// # Safety
/// - Both arguments must be valid null-terminated C strings or null
/// - Caller must free the returned pointer with `larder_stores_free`
#[no_mangle]
pub unsafe extern "C" fn larder_stores_new(
    favorites_text: *const c_char,
    shopping_text: *const c_char,
) -> *mut Stores {
    let mut favorites_storage = MemoryStorage::new();
    if let Some(text) = from_c_string(favorites_text) {
        if favorites_storage.set(FAVORITES_KEY, &text).is_err() {
            return ptr::null_mut();
        }
    }

    let mut shopping_storage = MemoryStorage::new();
    if let Some(text) = from_c_string(shopping_text) {
        if shopping_storage.set(SHOPPING_LIST_KEY, &text).is_err() {
            return ptr::null_mut();
        }
    }

    let stores = Stores {
        favorites: FavoritesStore::new(favorites_storage),
        shopping: ShoppingListStore::new(shopping_storage),
    };
    Box::into_raw(Box::new(stores))
}

/// Free a stores handle.
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn larder_stores_free(stores: *mut Stores) {
    if !stores.is_null() {
        drop(Box::from_raw(stores));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `larder_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn larder_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the engine version.
///
/// # Safety
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_version() -> *mut c_char {
    to_c_string(env!("CARGO_PKG_VERSION").to_string())
}

// ============================================================================
// Favorites
// ============================================================================

/// Load the favorites collection.
///
/// # Returns
/// JSON string: `{"ok": {"collection": {...}, "note": ...}}` or
/// `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_favorites_load(stores: *mut Stores) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.favorites.load() {
        Ok(loaded) => to_c_string(FfiResult::ok(loaded).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Add a recipe to a category, stamping it with `timestamp`.
///
/// # Arguments
/// - `recipe_json`: JSON string of a Recipe
/// - `category`: category name
/// - `timestamp`: current instant in milliseconds
///
/// # Returns
/// JSON string: `{"ok": <favorites>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `recipe_json` and `category` must be valid null-terminated C
///   strings or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_favorites_add_recipe(
    stores: *mut Stores,
    recipe_json: *const c_char,
    category: *const c_char,
    timestamp: Timestamp,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let recipe_str = match from_c_string(recipe_json) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid recipe JSON").to_json()),
    };

    let category = match from_c_string(category) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid category").to_json()),
    };

    let recipe: Recipe = match serde_json::from_str(&recipe_str) {
        Ok(r) => r,
        Err(e) => {
            return to_c_string(FfiResult::<()>::err(format!("parse error: {}", e)).to_json())
        }
    };

    match stores.favorites.add_recipe(recipe, &category, timestamp) {
        Ok(favorites) => to_c_string(FfiResult::ok(favorites).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Remove a recipe from a category by name (case-insensitive).
///
/// # Returns
/// JSON string: `{"ok": <favorites>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `name` and `category` must be valid null-terminated C strings or
///   null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_favorites_remove_recipe(
    stores: *mut Stores,
    name: *const c_char,
    category: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let name = match from_c_string(name) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid name").to_json()),
    };

    let category = match from_c_string(category) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid category").to_json()),
    };

    match stores.favorites.remove_recipe(&name, &category) {
        Ok(favorites) => to_c_string(FfiResult::ok(favorites).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Delete a category and everything in it.
///
/// # Returns
/// JSON string: `{"ok": <favorites>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `category` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_favorites_remove_category(
    stores: *mut Stores,
    category: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let category = match from_c_string(category) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid category").to_json()),
    };

    match stores.favorites.remove_category(&category) {
        Ok(favorites) => to_c_string(FfiResult::ok(favorites).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Canonical persisted favorites text, for host write-back.
///
/// # Returns
/// JSON string: `{"ok": "<text>"}`, `{"ok": null}` when nothing has been
/// persisted yet, or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_favorites_state(stores: *const Stores) -> *mut c_char {
    let stores = match stores.as_ref() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.favorites.persisted() {
        Ok(text) => to_c_string(FfiResult::ok(text).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

// ============================================================================
// Shopping List
// ============================================================================

/// Load the shopping list.
///
/// # Returns
/// JSON string: `{"ok": {"collection": [...], "note": ...}}` or
/// `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_load(stores: *mut Stores) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.shopping.load() {
        Ok(loaded) => to_c_string(FfiResult::ok(loaded).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Append items to the shopping list.
///
/// # Arguments
/// - `texts_json`: JSON array of strings, e.g. `["Milk", "Eggs"]`
///
/// # Returns
/// JSON string: `{"ok": <list>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `texts_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_add_items(
    stores: *mut Stores,
    texts_json: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let texts_str = match from_c_string(texts_json) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid items JSON").to_json()),
    };

    let texts: Vec<String> = match serde_json::from_str(&texts_str) {
        Ok(t) => t,
        Err(e) => {
            return to_c_string(FfiResult::<()>::err(format!("parse error: {}", e)).to_json())
        }
    };

    match stores.shopping.add_items(&texts) {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Replace the item at `index` wholesale.
///
/// Out-of-range indexes return the unchanged list.
///
/// # Returns
/// JSON string: `{"ok": <list>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `item_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_update_item(
    stores: *mut Stores,
    index: u64,
    item_json: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let item_str = match from_c_string(item_json) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid item JSON").to_json()),
    };

    let item: ShoppingItem = match serde_json::from_str(&item_str) {
        Ok(i) => i,
        Err(e) => {
            return to_c_string(FfiResult::<()>::err(format!("parse error: {}", e)).to_json())
        }
    };

    match stores.shopping.update_item(index as usize, item) {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Remove the item at `index`. Out-of-range is a no-op.
///
/// # Returns
/// JSON string: `{"ok": <list>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_remove_item(
    stores: *mut Stores,
    index: u64,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.shopping.remove_item(index as usize) {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Remove every checked item.
///
/// # Returns
/// JSON string: `{"ok": <list>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_clear_checked(stores: *mut Stores) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.shopping.clear_checked() {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Empty the shopping list.
///
/// # Returns
/// JSON string: `{"ok": []}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_clear_all(stores: *mut Stores) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.shopping.clear_all() {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Replace the full list, e.g. after a drag reorder.
///
/// # Arguments
/// - `items_json`: JSON array of ShoppingItem
///
/// # Returns
/// JSON string: `{"ok": <list>}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `items_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_replace_all(
    stores: *mut Stores,
    items_json: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let items_str = match from_c_string(items_json) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid items JSON").to_json()),
    };

    let items: crate::ShoppingList = match serde_json::from_str(&items_str) {
        Ok(i) => i,
        Err(e) => {
            return to_c_string(FfiResult::<()>::err(format!("parse error: {}", e)).to_json())
        }
    };

    match stores.shopping.replace_all(items) {
        Ok(list) => to_c_string(FfiResult::ok(list).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Canonical persisted shopping list text, for host write-back.
///
/// # Returns
/// JSON string: `{"ok": "<text>"}`, `{"ok": null}` when nothing has been
/// persisted yet, or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_shopping_state(stores: *const Stores) -> *mut c_char {
    let stores = match stores.as_ref() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    match stores.shopping.persisted() {
        Ok(text) => to_c_string(FfiResult::ok(text).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

// ============================================================================
// Backup
// ============================================================================

/// Export both collections as a backup envelope.
///
/// # Returns
/// JSON string: `{"ok": BackupData}` or `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_export_backup(stores: *mut Stores) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let favorites = match stores.favorites.load() {
        Ok(loaded) => loaded.collection,
        Err(e) => return to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    };
    let shopping = match stores.shopping.load() {
        Ok(loaded) => loaded.collection,
        Err(e) => return to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    };

    match BackupData::export(Some(&favorites), Some(&shopping)) {
        Ok(backup) => to_c_string(FfiResult::ok(backup).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Import a backup envelope, merging both parts.
///
/// # Arguments
/// - `backup_json`: JSON string of BackupData
///
/// # Returns
/// JSON string: `{"ok": {"newRecipes": n, "newItems": m, ...}}` or
/// `{"error": "message"}`
///
/// # Safety
/// - `stores` must be a valid pointer from `larder_stores_new` or null
/// - `backup_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `larder_string_free`
#[no_mangle]
pub unsafe extern "C" fn larder_import_backup(
    stores: *mut Stores,
    backup_json: *const c_char,
) -> *mut c_char {
    let stores = match stores.as_mut() {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("null stores pointer").to_json()),
    };

    let backup_str = match from_c_string(backup_json) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid backup JSON").to_json()),
    };

    let backup = match BackupData::from_json(&backup_str) {
        Ok(b) => b,
        Err(e) => return to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    };

    let mut summary = ImportSummary {
        new_recipes: 0,
        new_items: 0,
        favorites_note: None,
        shopping_note: None,
    };

    if let Some(raw) = &backup.favorites {
        match stores.favorites.import(raw) {
            Ok(imported) => {
                summary.new_recipes = imported.new_count;
                summary.favorites_note = imported.note;
            }
            Err(e) => return to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
        }
    }

    if let Some(raw) = &backup.shopping_list {
        match stores.shopping.import(raw) {
            Ok(imported) => {
                summary.new_items = imported.new_count;
                summary.shopping_note = imported.note;
            }
            Err(e) => return to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
        }
    }

    to_c_string(FfiResult::ok(summary).to_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffi_fresh_stores_load_empty() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            let result = larder_favorites_load(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains(r#""collection":{}"#));
            assert!(json.contains(r#""note":null"#));
            larder_string_free(result);

            let result = larder_shopping_load(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains(r#""collection":[]"#));
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_add_and_remove_recipe() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            let recipe =
                CString::new(r#"{"recipeName": "Pho", "ingredients": ["broth"]}"#).unwrap();
            let category = CString::new("Soups").unwrap();
            let result =
                larder_favorites_add_recipe(stores, recipe.as_ptr(), category.as_ptr(), 1000);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("\"ok\""));
            assert!(json.contains("Pho"));
            assert!(json.contains("\"dateAdded\":1000"));
            larder_string_free(result);

            let name = CString::new("pho").unwrap();
            let result = larder_favorites_remove_recipe(stores, name.as_ptr(), category.as_ptr());
            let json = CStr::from_ptr(result).to_str().unwrap();
            // Last recipe removed, category gone with it
            assert!(json.contains(r#""ok":{}"#));
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_state_returns_persisted_text() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            // Nothing persisted yet
            let result = larder_favorites_state(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert_eq!(json, r#"{"ok":null}"#);
            larder_string_free(result);

            let recipe = CString::new(r#"{"recipeName": "Pho", "ingredients": []}"#).unwrap();
            let category = CString::new("Soups").unwrap();
            let result =
                larder_favorites_add_recipe(stores, recipe.as_ptr(), category.as_ptr(), 1000);
            larder_string_free(result);

            let result = larder_favorites_state(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("Soups"));
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_corrupted_seed_recovers_with_note() {
        unsafe {
            let favorites_text =
                CString::new(r#"{"Desserts": [{"recipeName": "Cake"}, "bad"]}"#).unwrap();
            let stores = larder_stores_new(favorites_text.as_ptr(), ptr::null());

            let result = larder_favorites_load(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("removed 2 invalid favorite entries"));
            larder_string_free(result);

            // Healed: second load is clean
            let result = larder_favorites_load(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains(r#""note":null"#));
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_shopping_add_dedups() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            let texts = CString::new(r#"["Milk", "milk ", " Milk", "Eggs"]"#).unwrap();
            let result = larder_shopping_add_items(stores, texts.as_ptr());
            let json = CStr::from_ptr(result).to_str().unwrap();

            let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
            let list = parsed["ok"].as_array().unwrap();
            assert_eq!(list.len(), 2);
            assert_eq!(list[0]["text"], "Milk");
            assert_eq!(list[1]["text"], "Eggs");
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_shopping_update_and_clear() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            let texts = CString::new(r#"["Milk", "Eggs"]"#).unwrap();
            let result = larder_shopping_add_items(stores, texts.as_ptr());
            larder_string_free(result);

            let item = CString::new(r#"{"text": "Milk", "checked": true}"#).unwrap();
            let result = larder_shopping_update_item(stores, 0, item.as_ptr());
            larder_string_free(result);

            let result = larder_shopping_clear_checked(stores);
            let json = CStr::from_ptr(result).to_str().unwrap();
            let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
            let list = parsed["ok"].as_array().unwrap();
            assert_eq!(list.len(), 1);
            assert_eq!(list[0]["text"], "Eggs");
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }

    #[test]
    fn ffi_export_import_roundtrip() {
        unsafe {
            let stores = larder_stores_new(ptr::null(), ptr::null());

            let recipe = CString::new(r#"{"recipeName": "Pho", "ingredients": []}"#).unwrap();
            let category = CString::new("Soups").unwrap();
            let result =
                larder_favorites_add_recipe(stores, recipe.as_ptr(), category.as_ptr(), 1000);
            larder_string_free(result);

            let texts = CString::new(r#"["Milk"]"#).unwrap();
            let result = larder_shopping_add_items(stores, texts.as_ptr());
            larder_string_free(result);

            // Export
            let export_result = larder_export_backup(stores);
            let export_json = CStr::from_ptr(export_result).to_str().unwrap();
            let parsed: serde_json::Value = serde_json::from_str(export_json).unwrap();
            let backup_json = serde_json::to_string(&parsed["ok"]).unwrap();
            larder_string_free(export_result);

            // Import into a fresh pair of stores
            let stores2 = larder_stores_new(ptr::null(), ptr::null());
            let backup_cstr = CString::new(backup_json).unwrap();
            let import_result = larder_import_backup(stores2, backup_cstr.as_ptr());
            let import_json = CStr::from_ptr(import_result).to_str().unwrap();
            let summary: serde_json::Value = serde_json::from_str(import_json).unwrap();
            assert_eq!(summary["ok"]["newRecipes"], 1);
            assert_eq!(summary["ok"]["newItems"], 1);
            larder_string_free(import_result);

            // Importing the same backup again adds nothing
            let import_result = larder_import_backup(stores2, backup_cstr.as_ptr());
            let import_json = CStr::from_ptr(import_result).to_str().unwrap();
            let summary: serde_json::Value = serde_json::from_str(import_json).unwrap();
            assert_eq!(summary["ok"]["newRecipes"], 0);
            assert_eq!(summary["ok"]["newItems"], 0);
            larder_string_free(import_result);

            larder_stores_free(stores);
            larder_stores_free(stores2);
        }
    }

    #[test]
    fn ffi_version() {
        unsafe {
            let version = larder_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
            larder_string_free(version);
        }
    }

    #[test]
    fn ffi_error_handling() {
        unsafe {
            // Null stores pointer
            let result = larder_favorites_load(ptr::null_mut());
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("\"error\""));
            larder_string_free(result);

            // Invalid JSON payload
            let stores = larder_stores_new(ptr::null(), ptr::null());
            let bad = CString::new("not valid json").unwrap();
            let category = CString::new("Soups").unwrap();
            let result =
                larder_favorites_add_recipe(stores, bad.as_ptr(), category.as_ptr(), 1000);
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("\"error\""));
            larder_string_free(result);

            // Unparsable backup envelope
            let result = larder_import_backup(stores, bad.as_ptr());
            let json = CStr::from_ptr(result).to_str().unwrap();
            assert!(json.contains("\"error\""));
            larder_string_free(result);

            larder_stores_free(stores);
        }
    }
}

//! Backup envelope for export and import.
//!
//! The envelope carries independently optional snapshots of the two
//! collections, so partial backups are valid. The engine only validates
//! and merges the payload; reading and writing backup files is the
//! host's job.

use crate::codec;
use crate::error::{Error, Result};
use crate::{Favorites, ShoppingList};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Import/export envelope.
///
/// Both parts are raw JSON values on purpose: an imported file is
/// untrusted, and each part goes through shape recovery before it is
/// merged. Only the envelope itself has to be valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    /// Favorites snapshot, same shape as the persisted favorites entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Value>,
    /// Shopping list snapshot, same shape as the persisted list entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_list: Option<Value>,
}

impl BackupData {
    /// Build an envelope from current collections.
    pub fn export(
        favorites: Option<&Favorites>,
        shopping_list: Option<&ShoppingList>,
    ) -> Result<Self> {
        Ok(Self {
            favorites: favorites
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| Error::Codec(e.to_string()))?,
            shopping_list: shopping_list
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| Error::Codec(e.to_string()))?,
        })
    }

    /// Serialize the envelope for writing to a backup file.
    pub fn to_json(&self) -> Result<String> {
        codec::encode(self)
    }

    /// Parse a backup file's contents.
    ///
    /// Fails only when the text is not a JSON object at all; malformed
    /// data inside a parsed envelope is absorbed by recovery during
    /// import and surfaced as a note instead.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Codec(e.to_string()))
    }

    /// True when the envelope carries neither part.
    pub fn is_empty(&self) -> bool {
        self.favorites.is_none() && self.shopping_list.is_none()
    }
}

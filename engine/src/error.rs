//! Error types for the Larder engine.

use crate::storage::StorageError;
use thiserror::Error;

/// All possible errors from the Larder engine.
///
/// Structural corruption of persisted data is deliberately not here: the
/// recovery engine absorbs it and reports through a note instead. Only a
/// failing storage backend or an unserializable collection surface as
/// actual errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("storage access failed for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("serialization failed: {0}")]
    Codec(String),
}

impl Error {
    /// Wrap a backend error with the key that was being accessed.
    pub(crate) fn storage(key: impl Into<String>, source: StorageError) -> Self {
        Error::Storage {
            key: key.into(),
            source,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::storage("favorites", StorageError::new("disk full"));
        assert_eq!(
            err.to_string(),
            "storage access failed for key 'favorites': disk full"
        );

        let err = Error::Codec("bad value".into());
        assert_eq!(err.to_string(), "serialization failed: bad value");
    }
}

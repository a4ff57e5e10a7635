use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

/// Keys the planner reads at startup and writes through on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKey {
    TripArchive,
    UserGearLibrary,
    UserChoreLibrary,
    UserDownloadLibrary,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        Self::TripArchive,
        Self::UserGearLibrary,
        Self::UserChoreLibrary,
        Self::UserDownloadLibrary,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TripArchive => "tripArchive",
            Self::UserGearLibrary => "userGearLibrary",
            Self::UserChoreLibrary => "userChoreLibrary",
            Self::UserDownloadLibrary => "userDownloadLibrary",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    #[error("serialization error for {key}: {message}")]
    Encode { key: StorageKey, message: String },

    #[error("malformed value for {key}: {message}")]
    Decode { key: StorageKey, message: String },

    #[error("value too large for {key}: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge {
        key: StorageKey,
        size: usize,
        max: usize,
    },

    #[error("storage backend error for {key}: {message}")]
    Backend { key: StorageKey, message: String },
}

/// What the shell handed back for a `get`: bytes, nothing, or a backend error.
pub type StoredValue = Result<Option<Vec<u8>>, String>;

pub fn encode<T: Serialize + ?Sized>(
    key: StorageKey,
    value: &T,
) -> Result<Vec<u8>, StorageError> {
    let data = serde_json::to_vec(value).map_err(|e| StorageError::Encode {
        key,
        message: e.to_string(),
    })?;
    if data.len() > MAX_VALUE_SIZE {
        return Err(StorageError::ValueTooLarge {
            key,
            size: data.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(data)
}

pub fn decode<T: DeserializeOwned>(
    key: StorageKey,
    stored: StoredValue,
) -> Result<Option<T>, StorageError> {
    match stored {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                key,
                message: e.to_string(),
            }),
        Ok(None) => Ok(None),
        Err(message) => Err(StorageError::Backend { key, message }),
    }
}

/// Decodes a stored value, substituting `T::default()` when it is absent or
/// unreadable. Never fails.
pub fn decode_or_default<T: DeserializeOwned + Default>(
    key: StorageKey,
    stored: StoredValue,
) -> T {
    match decode(key, stored) {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!(%key, "no stored value, starting empty");
            T::default()
        }
        Err(e) => {
            warn!(error = %e, "discarding stored value");
            T::default()
        }
    }
}

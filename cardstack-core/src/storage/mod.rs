//! Local key/value storage port.
//!
//! Holds the per-page image cache and the auto-provisioned store identifier.
//! Any backend implementing [`KeyValueStore`] can be swapped in.
//!
//! # Keys
//!
//! ```text
//! license_<page>_front     # cached front image (URL or data URI)
//! license_<page>_back      # cached back image
//! driverLicense_front      # legacy unscoped front image
//! driverLicense_back       # legacy unscoped back image
//! jsonbin_bin_id           # auto-provisioned document id
//! ```

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::models::CardSide;
use crate::navigation::PageId;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which an auto-provisioned document id is remembered.
pub const STORE_ID_KEY: &str = "jsonbin_bin_id";

/// Errors from local storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error at {0}: {1}")]
    IoError(PathBuf, std::io::Error),

    #[error("Corrupt storage file {0}: {1}")]
    ParseError(PathBuf, serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Minimal key/value persistence, modeled on browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Cache key for a page's image.
pub fn image_key(page_id: &PageId, side: CardSide) -> String {
    format!("license_{}_{}", page_id, side)
}

/// Pre-paging key for an image, shared by all pages.
pub fn legacy_image_key(side: CardSide) -> String {
    format!("driverLicense_{}", side)
}

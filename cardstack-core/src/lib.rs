//! Cardstack Core Library
//!
//! Shared types and logic for the Cardstack viewer and settings flow.

pub mod data_uri;
pub mod gesture;
pub mod models;
pub mod navigation;
pub mod settings;
pub mod storage;
pub mod sync;
pub mod viewer;

pub use gesture::{render, CardPlacement, CardStack, GestureEvent, GestureState, StackView};
pub use models::{CardSide, Document, PageRecord};
pub use navigation::{settings_location, viewer_location, PageId};
pub use settings::{DraftImages, SaveError, SaveOutcome, SettingsSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use sync::{DocumentStore, ImageHost, StoreIdentifier, SyncClient, SyncError, UploadedImage};
pub use viewer::{load_viewer, CardStackPage, ImageSource, ResolvedImage};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

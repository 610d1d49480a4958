//! Remote persistence for page records.
//!
//! Two external services are involved:
//! 1. An image host that accepts a base64 upload and returns a public URL
//! 2. A JSON document store holding one document `{ pages: { <id>: record } }`
//!
//! Saving a page is a read-modify-write of the whole document. There is no
//! version check, so two clients saving different pages at the same time
//! race and the last full write wins.

mod client;
mod document_store;
mod error;
mod image_host;
mod store_id;

pub use client::SyncClient;
pub use document_store::{DocumentStore, DEFAULT_COLLECTION_URL};
pub use error::SyncError;
pub use image_host::{ImageHost, UploadedImage, DEFAULT_UPLOAD_URL};
pub use store_id::{StoreIdentifier, StoreMode, DEFAULT_BIN_NAME};

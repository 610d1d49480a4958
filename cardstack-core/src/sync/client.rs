//! Sync client combining the image host, the document store and local storage.
//!
//! Read paths never fail: any error is logged and the caller gets an empty
//! document. Write paths report success as a `bool`.

use super::document_store::DocumentStore;
use super::error::SyncError;
use super::image_host::{ImageHost, UploadedImage};
use super::store_id::StoreIdentifier;
use crate::models::{Document, PageRecord};
use crate::navigation::PageId;
use crate::storage::KeyValueStore;

/// Explicitly constructed client holding all remote configuration.
#[derive(Debug)]
pub struct SyncClient<S> {
    images: ImageHost,
    store: DocumentStore,
    store_id: StoreIdentifier,
    storage: S,
}

impl<S: KeyValueStore> SyncClient<S> {
    pub fn new(
        images: ImageHost,
        store: DocumentStore,
        store_id: StoreIdentifier,
        storage: S,
    ) -> Self {
        Self {
            images,
            store,
            store_id,
            storage,
        }
    }

    /// Local storage used for the image cache and the provisioned id.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn store_identifier(&self) -> &StoreIdentifier {
        &self.store_id
    }

    pub async fn upload_image(&self, image: &str) -> Result<UploadedImage, SyncError> {
        self.images.upload_image(image).await
    }

    /// Resolves the document id, provisioning one in auto mode.
    ///
    /// Returns `None` if no id can be obtained.
    pub async fn resolve_store_identifier(&self) -> Option<String> {
        match self.store_id.resolve(&self.store, &self.storage).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Could not resolve document id: {}", e);
                None
            }
        }
    }

    /// Fetches the whole document, or an empty one on any failure.
    pub async fn fetch_document(&self) -> Document {
        let Some(id) = self.resolve_store_identifier().await else {
            return Document::default();
        };

        match self.store.read(&id).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Document read failed: {}", e);
                Document::default()
            }
        }
    }

    /// Overwrites the whole remote document.
    pub async fn write_document(&self, doc: &Document) -> bool {
        let Some(id) = self.resolve_store_identifier().await else {
            return false;
        };

        match self.store.write(&id, doc).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Document write failed: {}", e);
                false
            }
        }
    }

    /// Stores a page's URLs with a fresh timestamp.
    ///
    /// Reads the full document, replaces one page and writes everything
    /// back. Other pages are written back as they were read.
    /// Not atomic: a concurrent save of another page can be lost.
    pub async fn save_page(
        &self,
        page_id: &PageId,
        front: Option<&str>,
        back: Option<&str>,
        qr: Option<&str>,
    ) -> bool {
        let mut doc = self.fetch_document().await;

        doc.set_page(
            page_id.as_str(),
            PageRecord::new(
                front.map(str::to_string),
                back.map(str::to_string),
                qr.map(str::to_string),
            ),
        );

        let saved = self.write_document(&doc).await;
        tracing::info!(page = %page_id, saved, "page save finished");
        saved
    }

    pub async fn load_page(&self, page_id: &PageId) -> Option<PageRecord> {
        self.fetch_document().await.page(page_id.as_str())
    }
}

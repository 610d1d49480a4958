//! Settings flow: edit a draft of a page's images and save it.
//!
//! Saving uploads each side that has new image data (front first, then
//! back) and only then writes the page record. An upload failure aborts the
//! save before anything is written; an image uploaded earlier in the same
//! save is left on the host.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::data_uri::is_data_uri;
use crate::models::{CardSide, PageRecord};
use crate::navigation::{viewer_location, PageId};
use crate::storage::{image_key, KeyValueStore, StorageError};
use crate::sync::{SyncClient, SyncError};

/// Unsaved image selection for one page.
///
/// A side whose data is set but whose URL is empty still needs uploading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftImages {
    pub front_image_data: Option<String>,
    pub back_image_data: Option<String>,
    pub front_url: Option<String>,
    pub back_url: Option<String>,
    pub qr_url: Option<String>,
}

impl DraftImages {
    pub fn from_record(record: &PageRecord) -> Self {
        Self {
            front_url: record.front.clone(),
            back_url: record.back.clone(),
            qr_url: record.qr.clone(),
            ..Self::default()
        }
    }

    pub fn image_data(&self, side: CardSide) -> Option<&str> {
        match side {
            CardSide::Front => self.front_image_data.as_deref(),
            CardSide::Back => self.back_image_data.as_deref(),
        }
    }

    pub fn url(&self, side: CardSide) -> Option<&str> {
        match side {
            CardSide::Front => self.front_url.as_deref(),
            CardSide::Back => self.back_url.as_deref(),
        }
    }

    fn slots_mut(&mut self, side: CardSide) -> (&mut Option<String>, &mut Option<String>) {
        match side {
            CardSide::Front => (&mut self.front_image_data, &mut self.front_url),
            CardSide::Back => (&mut self.back_image_data, &mut self.back_url),
        }
    }

    /// Replaces a side's image with new raw data, marking it for upload.
    pub fn set_image(&mut self, side: CardSide, data: impl Into<String>) {
        let (image, url) = self.slots_mut(side);
        *image = Some(data.into());
        *url = None;
    }

    /// Records the hosted URL for a side.
    pub fn set_url(&mut self, side: CardSide, new_url: impl Into<String>) {
        let (_, url) = self.slots_mut(side);
        *url = Some(new_url.into());
    }

    pub fn remove(&mut self, side: CardSide) {
        let (image, url) = self.slots_mut(side);
        *image = None;
        *url = None;
    }

    pub fn set_qr_url(&mut self, qr_url: Option<String>) {
        self.qr_url = qr_url;
    }

    pub fn needs_upload(&self, side: CardSide) -> bool {
        self.url(side).is_none() && self.image_data(side).is_some()
    }
}

/// Result of a save that was not aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Record written to the document store. Holds the viewer redirect.
    Saved { location: String },
    /// Document write failed; URLs were kept in local storage only.
    SavedLocally { location: String },
    /// Another save was already running; nothing was done.
    AlreadyInProgress,
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to upload {side} image: {source}")]
    UploadFailed {
        side: CardSide,
        #[source]
        source: SyncError,
    },

    #[error("Failed to store images locally: {0}")]
    StorageError(#[from] StorageError),
}

/// Settings surface for one page.
pub struct SettingsSession<'a, S> {
    client: &'a SyncClient<S>,
    page_id: PageId,
    draft: Mutex<DraftImages>,
    saving: AtomicBool,
}

/// Clears the in-flight flag when a save finishes or is dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<'a, S: KeyValueStore> SettingsSession<'a, S> {
    pub fn new(client: &'a SyncClient<S>, page_id: PageId) -> Self {
        Self {
            client,
            page_id,
            draft: Mutex::new(DraftImages::default()),
            saving: AtomicBool::new(false),
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    /// Seeds the draft from the stored record, then from the local cache.
    ///
    /// Cached values that are data URIs (left by older versions) become
    /// image data that still needs uploading.
    pub async fn load_existing(&self) -> DraftImages {
        let mut draft = match self.client.load_page(&self.page_id).await {
            Some(record) => DraftImages::from_record(&record),
            None => DraftImages::default(),
        };

        for side in CardSide::ALL {
            if draft.url(side).is_some() {
                continue;
            }
            match self.client.storage().get(&image_key(&self.page_id, side)) {
                Ok(Some(cached)) if is_data_uri(&cached) => draft.set_image(side, cached),
                Ok(Some(cached)) => draft.set_url(side, cached),
                Ok(None) => {}
                Err(e) => tracing::warn!("Could not read cached {} image: {}", side, e),
            }
        }

        self.replace_draft(draft.clone());
        draft
    }

    pub fn draft(&self) -> DraftImages {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_draft(&self, draft: DraftImages) {
        *self.draft.lock().unwrap_or_else(PoisonError::into_inner) = draft;
    }

    pub fn update_draft<F: FnOnce(&mut DraftImages)>(&self, f: F) {
        f(&mut self.draft.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Removes a side from the draft and from the local cache.
    pub fn remove_image(&self, side: CardSide) -> Result<(), StorageError> {
        self.update_draft(|d| d.remove(side));
        self.client
            .storage()
            .remove(&image_key(&self.page_id, side))
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Uploads pending images, then writes the page record.
    ///
    /// Returns [`SaveOutcome::AlreadyInProgress`] if called while another
    /// save on this session is running.
    pub async fn save(&self) -> Result<SaveOutcome, SaveError> {
        if self.saving.swap(true, Ordering::SeqCst) {
            tracing::debug!("save already in progress, ignoring");
            return Ok(SaveOutcome::AlreadyInProgress);
        }
        let _guard = SavingGuard(&self.saving);

        let front = self.resolve_side(CardSide::Front).await?;
        let back = self.resolve_side(CardSide::Back).await?;
        let qr = self.draft().qr_url;

        let saved = self
            .client
            .save_page(
                &self.page_id,
                front.as_deref(),
                back.as_deref(),
                qr.as_deref(),
            )
            .await;

        let cached = self.cache_locally(front.as_deref(), back.as_deref());
        let location = viewer_location(&self.page_id);

        if saved {
            if let Err(e) = cached {
                tracing::warn!("Saved remotely but local cache update failed: {}", e);
            }
            Ok(SaveOutcome::Saved { location })
        } else {
            cached?;
            tracing::warn!(page = %self.page_id, "document write failed, kept images locally");
            Ok(SaveOutcome::SavedLocally { location })
        }
    }

    /// Returns the URL for a side, uploading its image first if needed.
    async fn resolve_side(&self, side: CardSide) -> Result<Option<String>, SaveError> {
        let draft = self.draft();
        if !draft.needs_upload(side) {
            return Ok(draft.url(side).map(str::to_string));
        }

        let data = draft.image_data(side).unwrap_or_default();
        let uploaded = self
            .client
            .upload_image(data)
            .await
            .map_err(|source| SaveError::UploadFailed { side, source })?;

        tracing::info!("Uploaded {} image: {}", side, uploaded.url);
        self.update_draft(|d| d.set_url(side, uploaded.url.clone()));
        Ok(Some(uploaded.url))
    }

    fn cache_locally(&self, front: Option<&str>, back: Option<&str>) -> Result<(), StorageError> {
        let storage = self.client.storage();
        for (side, url) in [(CardSide::Front, front), (CardSide::Back, back)] {
            let key = image_key(&self.page_id, side);
            match url {
                Some(url) => storage.set(&key, url)?,
                None => storage.remove(&key)?,
            }
        }
        Ok(())
    }
}

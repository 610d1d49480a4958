//! Viewer: the card stack for one page with its resolved images.

use std::fmt;

use crate::gesture::CardStack;
use crate::models::{CardSide, PageRecord};
use crate::navigation::PageId;
use crate::storage::{image_key, legacy_image_key, KeyValueStore};
use crate::sync::SyncClient;

pub const DEFAULT_FRONT_IMAGE: &str = "photo_2025-12-27_17-55-50.jpg";
pub const DEFAULT_BACK_IMAGE: &str = "photo_2025-12-27_17-56-00.jpg";

/// Where a displayed image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Remote,
    LocalCache,
    Legacy,
    Default,
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote => write!(f, "remote"),
            ImageSource::LocalCache => write!(f, "local cache"),
            ImageSource::Legacy => write!(f, "legacy cache"),
            ImageSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub side: CardSide,
    pub src: String,
    pub source: ImageSource,
}

pub fn default_image(side: CardSide) -> &'static str {
    match side {
        CardSide::Front => DEFAULT_FRONT_IMAGE,
        CardSide::Back => DEFAULT_BACK_IMAGE,
    }
}

/// Picks the image for a side: remote record, page cache, legacy cache, default.
pub fn resolve_image<S: KeyValueStore>(
    record: Option<&PageRecord>,
    storage: &S,
    page_id: &PageId,
    side: CardSide,
) -> ResolvedImage {
    let resolved = |src: String, source| ResolvedImage { side, src, source };

    if let Some(url) = record.and_then(|r| r.url(side)) {
        return resolved(url.to_string(), ImageSource::Remote);
    }

    let candidates = [
        (image_key(page_id, side), ImageSource::LocalCache),
        (legacy_image_key(side), ImageSource::Legacy),
    ];
    for (key, source) in candidates {
        match storage.get(&key) {
            Ok(Some(value)) if !value.is_empty() => return resolved(value, source),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not read '{}': {}", key, e),
        }
    }

    resolved(default_image(side).to_string(), ImageSource::Default)
}

/// Everything needed to display one page.
#[derive(Debug, Clone)]
pub struct CardStackPage {
    pub page_id: PageId,
    pub front: ResolvedImage,
    pub back: ResolvedImage,
    pub qr: Option<String>,
    pub stack: CardStack,
}

impl CardStackPage {
    pub fn resolve<S: KeyValueStore>(
        page_id: PageId,
        record: Option<&PageRecord>,
        storage: &S,
    ) -> Self {
        Self {
            front: resolve_image(record, storage, &page_id, CardSide::Front),
            back: resolve_image(record, storage, &page_id, CardSide::Back),
            qr: record.and_then(|r| r.qr.clone()),
            stack: CardStack::new(),
            page_id,
        }
    }

    pub fn image(&self, side: CardSide) -> &ResolvedImage {
        match side {
            CardSide::Front => &self.front,
            CardSide::Back => &self.back,
        }
    }

    pub fn active_image(&self) -> &ResolvedImage {
        self.image(self.stack.current())
    }
}

/// Loads a page for display. Never fails; missing data falls back to defaults.
pub async fn load_viewer<S: KeyValueStore>(client: &SyncClient<S>, page_id: PageId) -> CardStackPage {
    let record = client.load_page(&page_id).await;
    if record.is_none() {
        tracing::debug!(page = %page_id, "no stored record, using fallbacks");
    }
    CardStackPage::resolve(page_id, record.as_ref(), client.storage())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_without_anything() {
        let page = CardStackPage::resolve(PageId::new("7"), None, &MemoryStore::new());
        assert_eq!(page.front.src, DEFAULT_FRONT_IMAGE);
        assert_eq!(page.front.source, ImageSource::Default);
        assert_eq!(page.back.src, DEFAULT_BACK_IMAGE);
        assert!(page.qr.is_none());
        assert_eq!(page.stack.current(), CardSide::Front);
    }

    #[test]
    fn test_remote_wins_over_cache() {
        let storage = MemoryStore::with_entries([("license_1_front", "cached-front")]);
        let record = PageRecord::new(Some("remote-front".to_string()), None, Some("qr".into()));

        let page = CardStackPage::resolve(PageId::default(), Some(&record), &storage);
        assert_eq!(page.front.src, "remote-front");
        assert_eq!(page.front.source, ImageSource::Remote);
        assert_eq!(page.back.source, ImageSource::Default);
        assert_eq!(page.qr.as_deref(), Some("qr"));
    }

    #[test]
    fn test_page_cache_then_legacy() {
        let storage = MemoryStore::with_entries([
            ("license_2_back", "cached-back"),
            ("driverLicense_front", "legacy-front"),
            ("driverLicense_back", "legacy-back"),
        ]);

        let page = CardStackPage::resolve(PageId::new("2"), None, &storage);
        assert_eq!(page.front.src, "legacy-front");
        assert_eq!(page.front.source, ImageSource::Legacy);
        assert_eq!(page.back.src, "cached-back");
        assert_eq!(page.back.source, ImageSource::LocalCache);
    }

    #[test]
    fn test_active_image_follows_stack() {
        let mut page = CardStackPage::resolve(PageId::default(), None, &MemoryStore::new());
        page.stack.swipe(-80.0);
        assert_eq!(page.active_image().side, CardSide::Back);
    }
}

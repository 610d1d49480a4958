//! Builds the sync client and local store from configuration.

use cardstack_core::{DocumentStore, FileStore, ImageHost, SyncClient};

use crate::config::Config;

/// Errors building a sync client.
#[derive(Debug)]
pub enum ClientError {
    /// A required setting is missing
    NotConfigured(&'static str),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::NotConfigured(setting) => write!(
                f,
                "Document store not configured: missing {}. Run 'cardstack config init' and edit the file.",
                setting
            ),
        }
    }
}

impl std::error::Error for ClientError {}

/// Local key/value store in the configured data directory.
pub fn local_storage(config: &Config) -> FileStore {
    FileStore::new(config.data_dir.value.clone())
}

/// Creates a sync client from config.
///
/// Returns an error if the document store is not configured. A missing image
/// host key is allowed here; uploads will be rejected by the host.
pub fn build_client(config: &Config) -> Result<SyncClient<FileStore>, ClientError> {
    let master_key = config
        .store
        .master_key
        .clone()
        .ok_or(ClientError::NotConfigured("store.master_key"))?;
    let store_id = config
        .store
        .store_identifier()
        .ok_or(ClientError::NotConfigured("store.bin_id"))?;

    Ok(SyncClient::new(
        ImageHost::new(
            config.image_host.upload_url.clone(),
            config.image_host.api_key.clone().unwrap_or_default(),
        ),
        DocumentStore::new(config.store.collection_url.clone(), master_key),
        store_id,
        local_storage(config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardstack_core::sync::StoreMode;
    use tempfile::tempdir;

    fn test_config() -> Config {
        let temp_dir = tempdir().unwrap();
        Config::load(Some(temp_dir.path().join("missing.yaml"))).unwrap()
    }

    #[test]
    fn test_missing_master_key() {
        let config = test_config();
        let err = build_client(&config).unwrap_err();
        assert!(err.to_string().contains("store.master_key"));
    }

    #[test]
    fn test_fixed_mode_needs_bin_id() {
        let mut config = test_config();
        config.store.master_key = Some("k".to_string());
        config.store.bin_id = None;

        let err = build_client(&config).unwrap_err();
        assert!(err.to_string().contains("store.bin_id"));
    }

    #[test]
    fn test_auto_mode_builds_without_bin_id() {
        let mut config = test_config();
        config.store.master_key = Some("k".to_string());
        config.store.bin_id = None;
        config.store.mode = StoreMode::Auto;

        let client = build_client(&config).unwrap();
        assert_eq!(client.store_identifier().mode(), StoreMode::Auto);
    }
}

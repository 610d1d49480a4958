//! Resolution of the remote document identifier.
//!
//! Two deployment modes exist and are never mixed:
//! - **Fixed**: every device shares one configured document id
//! - **Auto**: each device creates its own document on first use and
//!   remembers the id in local storage under [`STORE_ID_KEY`]

use serde::{Deserialize, Serialize};
use std::fmt;

use super::document_store::DocumentStore;
use super::error::SyncError;
use crate::storage::{KeyValueStore, STORE_ID_KEY};

/// Name given to auto-provisioned documents.
pub const DEFAULT_BIN_NAME: &str = "cardstack";

/// Deployment mode as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    #[default]
    Fixed,
    Auto,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Fixed => write!(f, "fixed"),
            StoreMode::Auto => write!(f, "auto"),
        }
    }
}

/// How the document id is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreIdentifier {
    /// Shared, hardcoded document id.
    Fixed(String),
    /// Per-device document created on demand under the given name.
    AutoProvisioned { bin_name: String },
}

impl StoreIdentifier {
    pub fn mode(&self) -> StoreMode {
        match self {
            StoreIdentifier::Fixed(_) => StoreMode::Fixed,
            StoreIdentifier::AutoProvisioned { .. } => StoreMode::Auto,
        }
    }

    pub(crate) async fn resolve<S: KeyValueStore>(
        &self,
        store: &DocumentStore,
        storage: &S,
    ) -> Result<String, SyncError> {
        match self {
            StoreIdentifier::Fixed(id) if id.is_empty() => Err(SyncError::StoreUnavailable(
                "no document id configured".to_string(),
            )),
            StoreIdentifier::Fixed(id) => Ok(id.clone()),
            StoreIdentifier::AutoProvisioned { bin_name } => {
                if let Some(id) = storage.get(STORE_ID_KEY)?.filter(|id| !id.is_empty()) {
                    return Ok(id);
                }

                tracing::info!("No stored document id, creating document '{}'", bin_name);
                let id = store.create(bin_name).await.map_err(|e| match e {
                    SyncError::StoreUnavailable(_) => e,
                    other => SyncError::StoreUnavailable(other.to_string()),
                })?;
                storage.set(STORE_ID_KEY, &id)?;
                tracing::info!("Created document {}", id);

                Ok(id)
            }
        }
    }
}

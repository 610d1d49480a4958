//! JSON document store client.
//!
//! Endpoints, relative to the collection URL:
//! - `POST /`           create a document, id returned at `metadata.id`
//! - `GET /{id}/latest` read, document wrapped at `record`
//! - `PUT /{id}`        overwrite the whole document

use serde::Deserialize;

use super::error::SyncError;
use crate::models::Document;

pub const DEFAULT_COLLECTION_URL: &str = "https://api.jsonbin.io/v3/b";

const MASTER_KEY_HEADER: &str = "X-Master-Key";
const BIN_NAME_HEADER: &str = "X-Bin-Name";

#[derive(Debug, Deserialize)]
struct ReadResponse {
    record: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    metadata: Option<CreateMetadata>,
}

#[derive(Debug, Deserialize)]
struct CreateMetadata {
    id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    http: reqwest::Client,
    collection_url: String,
    master_key: String,
}

impl DocumentStore {
    pub fn new(collection_url: impl Into<String>, master_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), collection_url, master_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        collection_url: impl Into<String>,
        master_key: impl Into<String>,
    ) -> Self {
        let collection_url = collection_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            collection_url,
            master_key: master_key.into(),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// Creates a new document holding `{ pages: {} }` and returns its id.
    pub async fn create(&self, name: &str) -> Result<String, SyncError> {
        let response = self
            .http
            .post(&self.collection_url)
            .header(MASTER_KEY_HEADER, &self.master_key)
            .header(BIN_NAME_HEADER, name)
            .json(&Document::default())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::StoreUnavailable(format!(
                "create returned status {}",
                response.status()
            )));
        }

        let body: CreateResponse = response.json().await?;
        body.metadata
            .and_then(|m| m.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SyncError::StoreUnavailable("create response has no metadata.id".into()))
    }

    /// Reads the latest version of a document.
    ///
    /// A response without a `record` yields an empty document.
    pub async fn read(&self, id: &str) -> Result<Document, SyncError> {
        let response = self
            .http
            .get(self.latest_url(id))
            .header(MASTER_KEY_HEADER, &self.master_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::StatusError(response.status().as_u16()));
        }

        let body: ReadResponse = response.json().await?;
        Ok(body.record.unwrap_or_default())
    }

    /// Overwrites a document. Success is the HTTP status alone.
    pub async fn write(&self, id: &str, doc: &Document) -> Result<(), SyncError> {
        let response = self
            .http
            .put(self.document_url(id))
            .header(MASTER_KEY_HEADER, &self.master_key)
            .json(doc)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SyncError::StatusError(response.status().as_u16()))
        }
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn latest_url(&self, id: &str) -> String {
        format!("{}/{}/latest", self.collection_url, id)
    }
}

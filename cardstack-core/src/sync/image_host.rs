//! Upload-only image host client.
//!
//! The host takes a form post with the API key and a base64 image and
//! answers with `{ success, data: { url, delete_url } }` or
//! `{ success: false, error }`.

use serde::Deserialize;

use super::error::SyncError;
use crate::data_uri::strip_data_uri_prefix;

pub const DEFAULT_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// A successfully hosted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    /// Page that deletes the image. Nothing calls it; failed saves leave uploads behind.
    pub delete_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
    delete_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageHost {
    http: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl ImageHost {
    pub fn new(upload_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), upload_url, api_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        upload_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            upload_url: upload_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Uploads an image given as base64 or as a data URI.
    pub async fn upload_image(&self, image: &str) -> Result<UploadedImage, SyncError> {
        let payload = strip_data_uri_prefix(image);
        tracing::debug!(bytes = payload.len(), "uploading image");

        let response = self
            .http
            .post(&self.upload_url)
            .form(&[("key", self.api_key.as_str()), ("image", payload)])
            .send()
            .await?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                SyncError::InvalidResponse(e.to_string())
            } else {
                SyncError::UploadError(format!("upload failed with status {}", status))
            }
        })?;

        match body {
            UploadResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(UploadedImage {
                url: data.url,
                delete_url: data.delete_url,
            }),
            UploadResponse { error, .. } => {
                let message = error
                    .as_ref()
                    .map(describe_host_error)
                    .unwrap_or_else(|| format!("upload failed with status {}", status));
                tracing::error!("Image host error: {}", message);
                Err(SyncError::UploadError(message))
            }
        }
    }
}

/// Picks the message out of the host's error payload.
fn describe_host_error(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_error_object() {
        let err = json!({"message": "Invalid API v1 key.", "code": 100});
        assert_eq!(describe_host_error(&err), "Invalid API v1 key.");
    }

    #[test]
    fn test_describe_error_string() {
        assert_eq!(describe_host_error(&json!("boom")), "boom");
    }

    #[test]
    fn test_describe_error_object_without_message() {
        let err = json!({"code": 100});
        assert_eq!(describe_host_error(&err), r#"{"code":100}"#);
    }

    #[test]
    fn test_parse_success_response() {
        let body = r#"{"success": true, "status": 200,
            "data": {"url": "https://i.ibb.co/x/front.jpg", "delete_url": "https://ibb.co/x/del"}}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.data.unwrap().url, "https://i.ibb.co/x/front.jpg");
    }
}

use crate::domain::model::ImageRef;
use crate::domain::ports::ObjectStorage;
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;

/// Object storage reached with plain HTTP `PUT`s.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    client: Client,
    endpoint: String,
    public_base_url: Option<String>,
    api_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_url: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            public_base_url: None,
            api_token: None,
        }
    }

    pub fn with_public_base_url(mut self, base: Option<String>) -> Self {
        self.public_base_url = base;
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn object_url(base: &str, destination: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), destination)
    }

    fn public_url(&self, destination: &str) -> String {
        let base = self.public_base_url.as_deref().unwrap_or(&self.endpoint);
        Self::object_url(base, destination)
    }
}

pub fn content_type_for(image: &ImageRef) -> &'static str {
    let extension = image
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, image: &ImageRef, destination: &str) -> Result<String> {
        let upload_error = |message: String| ListingError::ImageUploadError {
            image: image.to_string(),
            message,
        };

        // 讀取本地檔案
        let bytes = tokio::fs::read(image.path())
            .await
            .map_err(|e| upload_error(format!("cannot read file: {}", e)))?;

        let url = Self::object_url(&self.endpoint, destination);
        tracing::debug!("PUT {} ({} bytes)", url, bytes.len());

        let mut request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, content_type_for(image))
            .body(bytes);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(upload_error(format!("HTTP {}: {}", status, body.trim())));
        }

        // 回應沒有 downloadUrl 時改用公開網址
        let download_url = serde_json::from_str::<UploadResponse>(&body)
            .ok()
            .and_then(|r| r.download_url);

        Ok(download_url.unwrap_or_else(|| self.public_url(destination)))
    }
}

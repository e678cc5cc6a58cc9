use crate::domain::model::{Coordinates, Listing};
use crate::domain::ports::{DocumentStore, UserDirectory};
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use url::Url;

const USERS_COLLECTION: &str = "users";

/// Document store reached over a JSON REST API.
///
/// Inserts go to `POST {endpoint}/collections/{collection}/documents` and the
/// response carries the generated id as `{"id": "..."}`. User profiles are
/// read from `GET {endpoint}/collections/users/documents/{user_id}`.
#[derive(Debug, Clone)]
pub struct RestDocumentStore {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

impl RestDocumentStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_token: None,
        }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Appends each segment percent-encoded, so a `/` or `?` inside an id
    /// stays part of that segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: &str| ListingError::InvalidConfigValueError {
            field: "backend.endpoint".to_string(),
            value: self.endpoint.clone(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| invalid(&e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn insert(&self, collection: &str, listing: &Listing) -> Result<String> {
        let url = self.url(&["collections", collection, "documents"])?;
        tracing::debug!("POST {}", url);

        let response = self
            .authorize(self.client.post(url))
            .json(listing)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::MetadataWriteError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let created: InsertResponse = response.json().await?;
        Ok(created.id)
    }
}

#[async_trait]
impl UserDirectory for RestDocumentStore {
    async fn home_location(&self, user_id: &str) -> Result<Option<Coordinates>> {
        let url = self.url(&["collections", USERS_COLLECTION, "documents", user_id])?;
        tracing::debug!("GET {}", url);

        let response = self.authorize(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let profile: serde_json::Value = response.error_for_status()?.json().await?;
        let lat = profile.get("lat").and_then(coordinate);
        let lon = profile.get("lon").and_then(coordinate);

        Ok(match (lat, lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        })
    }
}

// 使用者資料中的座標可能是字串或數字
fn coordinate(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

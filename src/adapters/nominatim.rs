use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Forward and reverse geocoding against an OpenStreetMap Nominatim server.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    user_agent: String,
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Deserialize)]
struct ReverseHit {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header(USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await
            .map_err(geocoding_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::GeocodingError {
                message: format!("{} returned HTTP {}", path, status),
            });
        }
        response.json().await.map_err(geocoding_error)
    }
}

fn geocoding_error(e: reqwest::Error) -> ListingError {
    ListingError::GeocodingError {
        message: e.to_string(),
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>> {
        let hits: Vec<SearchHit> = self
            .get_json(
                "search",
                &[
                    ("q", address.to_string()),
                    ("format", "json".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => Ok(Some(Coordinates::new(latitude, longitude))),
            _ => Err(ListingError::GeocodingError {
                message: format!("unparseable coordinates '{}', '{}'", hit.lat, hit.lon),
            }),
        }
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>> {
        // Nominatim 找不到時回傳 {"error": "..."}，display_name 缺席
        let hit: ReverseHit = self
            .get_json(
                "reverse",
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;
        Ok(hit.display_name)
    }
}

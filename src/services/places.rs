use crate::core::distance::METERS_PER_MILE;
use crate::models::{GeoCoordinate, PlaceResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Largest radius the nearby search endpoint accepts
const MAX_PROVIDER_RADIUS_METERS: f64 = 50_000.0;

/// Errors that can occur when calling the places provider
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {message}")]
    ProviderError { status: String, message: String },

    #[error("API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct NearbySearchBody {
    status: String,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Image bytes proxied from the provider
#[derive(Debug, Clone)]
pub struct PlacePhotoData {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Places provider client (nearby search + photos)
///
/// The API key never leaves the server; clients go through the proxy routes.
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PlacesClient {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Search restaurants near a location
    ///
    /// Results come back in provider order; distance filtering is the caller's job.
    pub async fn nearby_restaurants(
        &self,
        origin: GeoCoordinate,
        radius_miles: f64,
        keyword: Option<&str>,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let url = format!("{}/nearbysearch/json", self.base_url.trim_end_matches('/'));
        let location = format!("{},{}", origin.latitude, origin.longitude);
        let radius = format!("{:.0}", radius_meters(radius_miles));

        let mut query: Vec<(&str, &str)> = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", "restaurant"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(keyword) = keyword.filter(|k| !k.trim().is_empty()) {
            query.push(("keyword", keyword));
        }

        tracing::debug!("Nearby search at {} (radius {}m)", location, radius);

        let response = self.client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            return Err(PlacesError::ApiError(format!(
                "Nearby search failed: {}",
                response.status()
            )));
        }

        let body: NearbySearchBody = response.json().await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                let places = parse_places(body.results);
                tracing::debug!("Provider returned {} places", places.len());
                Ok(places)
            }
            _ => Err(PlacesError::ProviderError {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    /// Fetch a place photo by its reference
    pub async fn fetch_photo(&self, reference: &str, max_width: u32) -> Result<PlacePhotoData, PlacesError> {
        let url = format!("{}/photo", self.base_url.trim_end_matches('/'));
        let max_width = max_width.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("maxwidth", max_width.as_str()),
                ("photo_reference", reference),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlacesError::ApiError(format!(
                "Photo fetch failed: {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response.bytes().await?.to_vec();

        Ok(PlacePhotoData { content_type, bytes })
    }
}

/// Decode provider results one by one, skipping (and logging) malformed records
fn parse_places(results: Vec<Value>) -> Vec<PlaceResult> {
    results
        .into_iter()
        .filter_map(|place| match serde_json::from_value(place) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed place result: {}", e);
                None
            }
        })
        .collect()
}

/// Convert a search radius to the provider's metric radius, capped at its maximum
pub fn radius_meters(radius_miles: f64) -> f64 {
    (radius_miles.max(0.0) * METERS_PER_MILE).min(MAX_PROVIDER_RADIUS_METERS)
}

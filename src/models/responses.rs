use serde::{Deserialize, Serialize};
use crate::models::domain::{Candidate, MenuCategory};

/// A recommended restaurant as presented to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedRestaurant {
    #[serde(rename = "restaurantId")]
    pub restaurant_id: String,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    pub categories: Vec<MenuCategory>,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendedRestaurant>,
    #[serde(rename = "totalRestaurants")]
    pub total_restaurants: usize,
}

/// A single restaurant's menu after filtering
pub type RestaurantMenuResponse = RecommendedRestaurant;

/// Response for nearby search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbySearchResponse {
    pub candidates: Vec<Candidate>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for restaurant recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query for a single restaurant's filtered menu
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Nearby restaurant search around a user location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbySearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(alias = "radius_miles", rename = "radiusMiles", default)]
    pub radius_miles: Option<f64>,
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Photo proxy query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PhotoQuery {
    #[validate(length(min = 1))]
    pub reference: String,
    #[validate(range(min = 1, max = 1600))]
    #[serde(alias = "max_width", rename = "maxWidth", default = "default_photo_width")]
    pub max_width: u32,
}

fn default_photo_width() -> u32 {
    400
}

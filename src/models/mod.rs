// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AllergenProfile, Candidate, GeoCoordinate, MenuCategory, MenuItem, PlaceGeometry, PlaceLocation, PlacePhoto, PlaceResult, Recommendation, Restaurant};
pub use requests::{MenuQuery, NearbySearchRequest, PhotoQuery, RecommendRequest};
pub use responses::{ErrorResponse, HealthResponse, NearbySearchResponse, RecommendResponse, RecommendedRestaurant, RestaurantMenuResponse};

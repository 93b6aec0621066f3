//! Menu Algo - allergen-aware restaurant recommendations
//!
//! This library provides the filtering engine behind the menu app: distance-bounded
//! place search, allergen and dedup filtering of menu items, and restaurant
//! recommendation, plus the HTTP layer that feeds it from the document store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Recommender, RecommendationResult, distance::{haversine_distance, filter_by_distance}};
pub use models::{AllergenProfile, Candidate, GeoCoordinate, MenuCategory, MenuItem, Recommendation, Restaurant};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let distance = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
        assert!(distance.abs() < 1e-9);
        assert!(Recommender::default().max_results().is_none());
    }
}

// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod recommender;

pub use distance::{haversine_distance, distance_to, filter_by_distance, is_within_radius};
pub use filters::{active_allergens, filter_allergens, filter_owned_items, owned_item_names, passes_allergen_filter};
pub use recommender::{filter_menu, Recommender, RecommendationResult};

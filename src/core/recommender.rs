use crate::models::{AllergenProfile, MenuCategory, MenuItem, Recommendation, Restaurant};
use crate::core::filters::{active_allergens, filter_allergens, filter_owned_items, owned_item_names};
use std::collections::HashSet;

/// Result of the recommendation pass
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub total_restaurants: usize,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Dedup against the user's saved and created menus
/// 2. Allergen exclusion
/// 3. Qualification (at least one surviving item)
///
/// Qualifying restaurants keep their input order; there is no scoring.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    max_results: Option<usize>,
}

impl Recommender {
    pub fn new(max_results: Option<usize>) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Find restaurants with at least one safe, not-yet-owned item
    ///
    /// # Arguments
    /// * `restaurants` - Restaurants with their full menus, in provider order
    /// * `profile` - The user's allergen profile, if any
    /// * `owned` - Items from the user's saved and created menus
    /// * `limit` - Per-request cap, further bounded by the configured maximum
    pub fn recommend(
        &self,
        restaurants: Vec<Restaurant>,
        profile: Option<&AllergenProfile>,
        owned: &[MenuItem],
        limit: Option<usize>,
    ) -> RecommendationResult {
        let total_restaurants = restaurants.len();
        let active = active_allergens(profile);
        let owned_names = owned_item_names(owned);

        let recommendations = restaurants
            .into_iter()
            .filter_map(|restaurant| recommend_restaurant(restaurant, &active, &owned_names));

        let recommendations: Vec<Recommendation> = match self.effective_limit(limit) {
            Some(n) => recommendations.take(n).collect(),
            None => recommendations.collect(),
        };

        RecommendationResult {
            recommendations,
            total_restaurants,
        }
    }

    fn effective_limit(&self, requested: Option<usize>) -> Option<usize> {
        match (requested, self.max_results) {
            (Some(r), Some(m)) => Some(r.min(m)),
            (r, m) => r.or(m),
        }
    }
}

/// Apply both filters to every category of a menu, dropping emptied categories
pub fn filter_menu(
    menu: Vec<MenuCategory>,
    active: &HashSet<String>,
    owned_names: &HashSet<&str>,
) -> Vec<MenuCategory> {
    menu.into_iter()
        .map(|category| MenuCategory {
            items: filter_allergens(filter_owned_items(category.items, owned_names), active),
            category: category.category,
        })
        .filter(|category| !category.is_empty())
        .collect()
}

fn recommend_restaurant(
    restaurant: Restaurant,
    active: &HashSet<String>,
    owned_names: &HashSet<&str>,
) -> Option<Recommendation> {
    let categories = filter_menu(restaurant.menu, active, owned_names);

    if categories.is_empty() {
        tracing::trace!("Restaurant {} has no qualifying items", restaurant.id);
        return None;
    }

    Some(Recommendation {
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.name,
        categories,
    })
}

use crate::models::{AllergenProfile, MenuItem};
use std::collections::HashSet;

/// Normalize an allergen tag for comparison (trimmed, lowercase)
#[inline]
pub fn normalize_allergen(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Build the active exclusion set from a user's allergen profile
///
/// A missing profile excludes nothing.
pub fn active_allergens(profile: Option<&AllergenProfile>) -> HashSet<String> {
    profile
        .map(|p| p.flagged().map(normalize_allergen).collect())
        .unwrap_or_default()
}

/// Check if an item is safe for the given active allergen set
///
/// Items without allergen tags always pass.
#[inline]
pub fn passes_allergen_filter(item: &MenuItem, active: &HashSet<String>) -> bool {
    if active.is_empty() {
        return true;
    }

    !item
        .allergens
        .iter()
        .any(|tag| active.contains(&normalize_allergen(tag)))
}

/// Keep only items whose allergen tags do not intersect the active set
pub fn filter_allergens(items: Vec<MenuItem>, active: &HashSet<String>) -> Vec<MenuItem> {
    items
        .into_iter()
        .filter(|item| passes_allergen_filter(item, active))
        .collect()
}

/// Collect the names of items the user already owns
pub fn owned_item_names(owned: &[MenuItem]) -> HashSet<&str> {
    owned.iter().map(|item| item.name.as_str()).collect()
}

/// Check if an item is not already in the user's collection
///
/// Matching is by exact, case-sensitive name across all restaurants.
#[inline]
pub fn is_not_owned(item: &MenuItem, owned_names: &HashSet<&str>) -> bool {
    !owned_names.contains(item.name.as_str())
}

/// Drop items the user already has in a saved or created menu
pub fn filter_owned_items(items: Vec<MenuItem>, owned_names: &HashSet<&str>) -> Vec<MenuItem> {
    items
        .into_iter()
        .filter(|item| is_not_owned(item, owned_names))
        .collect()
}

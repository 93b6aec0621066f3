use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single dish on a restaurant menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "$id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_allergens")]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub category: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// Decode the `allergens` field without ever failing the whole item.
///
/// Anything that is not an array decodes as an empty list; non-string
/// entries inside an array are dropped.
fn deserialize_allergens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(tags)) => tags
            .into_iter()
            .filter_map(|tag| match tag {
                Value::String(s) => Some(s),
                other => {
                    tracing::warn!("Dropping non-string allergen tag: {}", other);
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!("Malformed allergens field treated as empty: {}", other);
            Vec::new()
        }
    })
}

/// Menu items sharing a category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}

impl MenuCategory {
    /// Group a flat item list into categories, in first-seen category order
    pub fn group(items: Vec<MenuItem>) -> Vec<MenuCategory> {
        let mut categories: Vec<MenuCategory> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for item in items {
            match index.get(&item.category) {
                Some(&i) => categories[i].items.push(item),
                None => {
                    index.insert(item.category.clone(), categories.len());
                    categories.push(MenuCategory {
                        category: item.category.clone(),
                        items: vec![item],
                    });
                }
            }
        }

        categories
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Restaurant with its full menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "$id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub menu: Vec<MenuCategory>,
}

/// Per-user allergen flags; only `true` entries exclude items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergenProfile(pub HashMap<String, bool>);

impl AllergenProfile {
    pub fn new(flags: HashMap<String, bool>) -> Self {
        Self(flags)
    }

    /// Allergen names flagged `true`, as stored
    pub fn flagged(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.as_str())
    }
}

impl<const N: usize> From<[(&str, bool); N]> for AllergenProfile {
    fn from(entries: [(&str, bool); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, flag)| (name.to_string(), flag))
                .collect(),
        )
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Raw venue record as returned by the places provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceGeometry {
    #[serde(default)]
    pub location: Option<PlaceLocation>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaceLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl PlaceLocation {
    /// Both coordinates, or `None` when the provider left either out
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        Some(GeoCoordinate::new(self.lat?, self.lng?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacePhoto {
    #[serde(default)]
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Search result annotated with its distance from the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "placeId")]
    pub place_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<GeoCoordinate>,
    /// Miles from the search origin; `NaN` until computed or when location is missing
    pub distance: f64,
    #[serde(rename = "photoReference")]
    pub photo_reference: Option<String>,
    pub icon: Option<String>,
}

impl From<PlaceResult> for Candidate {
    fn from(place: PlaceResult) -> Self {
        let location = place
            .geometry
            .and_then(|g| g.location)
            .and_then(|l| l.coordinate());

        Self {
            place_id: place.place_id,
            name: place.name,
            address: place.vicinity.or(place.formatted_address),
            location,
            distance: f64::NAN,
            photo_reference: place.photos.into_iter().find_map(|p| p.photo_reference),
            icon: place.icon,
        }
    }
}

/// A qualifying restaurant with the menu items that survived filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "restaurantId")]
    pub restaurant_id: String,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    pub categories: Vec<MenuCategory>,
}

impl Recommendation {
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allergens_missing_is_empty() {
        let item: MenuItem = serde_json::from_value(json!({
            "name": "Fries",
            "category": "Sides"
        }))
        .unwrap();

        assert!(item.allergens.is_empty());
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_allergens_not_a_list_is_empty() {
        let item: MenuItem = serde_json::from_value(json!({
            "name": "Pad Thai",
            "category": "Noodles",
            "allergens": "peanuts"
        }))
        .unwrap();

        assert!(item.allergens.is_empty());
    }

    #[test]
    fn test_allergens_drops_non_string_tags() {
        let item: MenuItem = serde_json::from_value(json!({
            "name": "Pad Thai",
            "category": "Noodles",
            "allergens": ["Peanuts", 3, null, "shellfish"]
        }))
        .unwrap();

        assert_eq!(item.allergens, vec!["Peanuts", "shellfish"]);
    }

    #[test]
    fn test_item_requires_category() {
        let result: Result<MenuItem, _> = serde_json::from_value(json!({ "name": "Soup" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_store_id_field() {
        let item: MenuItem = serde_json::from_value(json!({
            "$id": "abc",
            "name": "Soup",
            "category": "Starters",
            "imageUrl": "https://blob.test/soup.png"
        }))
        .unwrap();

        assert_eq!(item.id.as_deref(), Some("abc"));
        assert_eq!(item.image_url.as_deref(), Some("https://blob.test/soup.png"));
    }

    #[test]
    fn test_group_keeps_first_seen_order() {
        let item = |name: &str, category: &str| MenuItem {
            id: None,
            name: name.to_string(),
            description: String::new(),
            allergens: vec![],
            note: None,
            category: category.to_string(),
            image_url: None,
        };

        let grouped = MenuCategory::group(vec![
            item("Soup", "Starters"),
            item("Steak", "Mains"),
            item("Bread", "Starters"),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].category, "Starters");
        assert_eq!(grouped[0].items.len(), 2);
        assert_eq!(grouped[0].items[1].name, "Bread");
        assert_eq!(grouped[1].category, "Mains");
    }

    #[test]
    fn test_profile_flagged() {
        let profile = AllergenProfile::from([("peanuts", true), ("dairy", false)]);
        let flagged: Vec<&str> = profile.flagged().collect();
        assert_eq!(flagged, vec!["peanuts"]);
    }

    #[test]
    fn test_candidate_from_place() {
        let place: PlaceResult = serde_json::from_value(json!({
            "place_id": "p1",
            "name": "Joe's",
            "vicinity": "1 Main St",
            "geometry": { "location": { "lat": 40.7, "lng": -74.0 } },
            "photos": [{ "photo_reference": "ref1", "width": 400, "height": 300 }]
        }))
        .unwrap();

        let candidate = Candidate::from(place);
        assert_eq!(candidate.address.as_deref(), Some("1 Main St"));
        assert_eq!(candidate.location, Some(GeoCoordinate::new(40.7, -74.0)));
        assert_eq!(candidate.photo_reference.as_deref(), Some("ref1"));
        assert!(candidate.distance.is_nan());
    }

    #[test]
    fn test_candidate_without_geometry() {
        let place: PlaceResult = serde_json::from_value(json!({ "name": "Nowhere" })).unwrap();
        let candidate = Candidate::from(place);
        assert!(candidate.location.is_none());
    }

    #[test]
    fn test_candidate_with_partial_geometry() {
        let place: PlaceResult = serde_json::from_value(json!({
            "name": "Half There",
            "geometry": { "location": { "lat": 40.7, "lng": null } },
            "photos": [{ "width": 10 }, { "photo_reference": "second" }]
        }))
        .unwrap();

        let candidate = Candidate::from(place);
        assert!(candidate.location.is_none());
        assert_eq!(candidate.photo_reference.as_deref(), Some("second"));
    }
}

// Integration tests for Menu Algo

use menu_algo::core::{Recommender, filters::{active_allergens, owned_item_names}, filter_menu};
use menu_algo::models::{AllergenProfile, MenuCategory, MenuItem, Restaurant};
use serde_json::json;

fn create_item(name: &str, category: &str, allergens: &[&str]) -> MenuItem {
    MenuItem {
        id: None,
        name: name.to_string(),
        description: format!("{} description", name),
        allergens: allergens.iter().map(|a| a.to_string()).collect(),
        note: None,
        category: category.to_string(),
        image_url: None,
    }
}

fn create_restaurant(id: &str, name: &str, items: Vec<MenuItem>) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail_url: Some(format!("https://blob.test/{}.png", id)),
        menu: MenuCategory::group(items),
    }
}

#[test]
fn test_integration_end_to_end_recommendations() {
    let recommender = Recommender::default();
    let profile = AllergenProfile::from([("peanuts", true), ("shellfish", true), ("dairy", false)]);
    let owned = vec![create_item("Caesar Salad", "Salads", &[])];

    let restaurants = vec![
        // Category 1 fully excluded, one item in category 2 survives
        create_restaurant(
            "thai",
            "Thai Garden",
            vec![
                create_item("Satay", "Starters", &["Peanuts"]),
                create_item("Shrimp Chips", "Starters", &["shellfish"]),
                create_item("Green Curry", "Mains", &["coconut"]),
                create_item("Pad Thai", "Mains", &["peanuts", "egg"]),
            ],
        ),
        // Only owned or unsafe items
        create_restaurant(
            "bistro",
            "Bistro",
            vec![
                create_item("Caesar Salad", "Salads", &[]),
                create_item("Lobster Roll", "Mains", &["Shellfish"]),
            ],
        ),
        // Dairy flag is false, so dairy items survive
        create_restaurant(
            "creamery",
            "Creamery",
            vec![create_item("Sundae", "Desserts", &["Dairy"])],
        ),
        create_restaurant("empty", "Empty Kitchen", vec![]),
    ];

    let result = recommender.recommend(restaurants, Some(&profile), &owned, None);

    assert_eq!(result.total_restaurants, 4);

    let ids: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.restaurant_id.as_str())
        .collect();
    assert_eq!(ids, vec!["thai", "creamery"]);

    let thai = &result.recommendations[0];
    assert_eq!(thai.restaurant_name, "Thai Garden");
    assert_eq!(thai.categories.len(), 1);
    assert_eq!(thai.categories[0].category, "Mains");
    assert_eq!(thai.item_count(), 1);
    assert_eq!(thai.categories[0].items[0].name, "Green Curry");
}

#[test]
fn test_dedup_is_global_across_restaurants() {
    let recommender = Recommender::default();
    let owned = vec![create_item("Margherita", "Pizza", &[])];

    let restaurants = vec![
        create_restaurant("a", "Pizzeria A", vec![create_item("Margherita", "Pizza", &[])]),
        create_restaurant("b", "Pizzeria B", vec![create_item("Margherita", "Pizzas", &[])]),
    ];

    let result = recommender.recommend(restaurants, None, &owned, None);
    assert!(result.recommendations.is_empty());
}

#[test]
fn test_no_profile_means_no_exclusions() {
    let recommender = Recommender::default();
    let restaurants = vec![create_restaurant(
        "1",
        "Nut House",
        vec![create_item("Peanut Brittle", "Desserts", &["peanuts", "tree nuts"])],
    )];

    let result = recommender.recommend(restaurants, None, &[], None);
    assert_eq!(result.recommendations.len(), 1);
}

#[test]
fn test_recommendations_from_store_documents() {
    // Documents as they come back from the store, including malformed allergen data
    let items: Vec<MenuItem> = serde_json::from_value(json!([
        { "$id": "1", "name": "Falafel Wrap", "category": "Wraps", "allergens": ["Sesame"] },
        { "$id": "2", "name": "Chicken Wrap", "category": "Wraps", "allergens": "gluten" },
        { "$id": "3", "name": "Hummus", "category": "Dips", "allergens": ["sesame", "chickpea"] },
        { "$id": "4", "name": "Lemonade", "category": "Drinks" }
    ]))
    .unwrap();

    let restaurant: Restaurant = serde_json::from_value(json!({
        "$id": "r1",
        "name": "Mezze",
        "thumbnailUrl": "https://blob.test/mezze.png"
    }))
    .unwrap();
    let restaurant = Restaurant {
        menu: MenuCategory::group(items),
        ..restaurant
    };

    let profile: AllergenProfile =
        serde_json::from_value(json!({ "sesame": true, "gluten": true })).unwrap();

    let result = Recommender::default().recommend(vec![restaurant], Some(&profile), &[], None);

    assert_eq!(result.recommendations.len(), 1);
    let categories: Vec<(&str, Vec<&str>)> = result.recommendations[0]
        .categories
        .iter()
        .map(|c| (c.category.as_str(), c.items.iter().map(|i| i.name.as_str()).collect()))
        .collect();

    // The chicken wrap's malformed tags fail open
    assert_eq!(
        categories,
        vec![("Wraps", vec!["Chicken Wrap"]), ("Drinks", vec!["Lemonade"])]
    );
}

#[test]
fn test_filter_menu_single_restaurant() {
    let profile = AllergenProfile::from([("egg", true)]);
    let active = active_allergens(Some(&profile));
    let owned = vec![create_item("Pancakes", "Breakfast", &[])];
    let owned_names = owned_item_names(&owned);

    let menu = MenuCategory::group(vec![
        create_item("Pancakes", "Breakfast", &[]),
        create_item("Omelette", "Breakfast", &["Egg"]),
        create_item("Oatmeal", "Breakfast", &[]),
        create_item("Egg Salad", "Lunch", &["egg"]),
    ]);

    let filtered = filter_menu(menu, &active, &owned_names);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].category, "Breakfast");
    assert_eq!(filtered[0].items.len(), 1);
    assert_eq!(filtered[0].items[0].name, "Oatmeal");
}

#[test]
fn test_max_results_preserves_order() {
    let recommender = Recommender::new(Some(2));
    let restaurants: Vec<Restaurant> = (0..5)
        .map(|i| {
            create_restaurant(
                &i.to_string(),
                &format!("Diner {}", i),
                vec![create_item("Toast", "Breakfast", &[])],
            )
        })
        .collect();

    let result = recommender.recommend(restaurants, None, &[], None);
    let ids: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.restaurant_id.as_str())
        .collect();

    assert_eq!(ids, vec!["0", "1"]);
    assert_eq!(result.total_restaurants, 5);
}

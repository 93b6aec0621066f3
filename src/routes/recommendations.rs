use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{active_allergens, filter_menu, owned_item_names};
use crate::models::{HealthResponse, MenuQuery, RecommendRequest, RecommendResponse, RecommendedRestaurant, Restaurant, RestaurantMenuResponse};
use crate::routes::{error_response, AppState};
use crate::services::{AppwriteClient, AppwriteError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Configure recommendation and menu routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(recommend))
        .route("/restaurants/{restaurant_id}/menu", web::get().to(restaurant_menu));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 10
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let user_id = &req.user_id;
    let limit = req.limit.map(usize::from);

    tracing::info!("Building recommendations for user: {}, limit: {:?}", user_id, limit);

    let pipeline = build_recommendations(&state, user_id, limit);

    match tokio::time::timeout(state.request_timeout, pipeline).await {
        Ok(Ok(response)) => {
            tracing::info!(
                "Returning {} recommendations for user {} (from {} restaurants)",
                response.recommendations.len(),
                user_id,
                response.total_restaurants
            );
            HttpResponse::Ok().json(response)
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to build recommendations for {}: {}", user_id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to fetch restaurant data", e)
        }
        Err(_) => {
            tracing::error!("Recommendations for {} timed out after {:?}", user_id, state.request_timeout);
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Request timed out",
                "Restaurant data took too long to load",
            )
        }
    }
}

async fn build_recommendations(
    state: &AppState,
    user_id: &str,
    limit: Option<usize>,
) -> Result<RecommendResponse, AppwriteError> {
    let (profile, owned, restaurants) = tokio::try_join!(
        state.appwrite.get_allergen_profile(user_id),
        state.appwrite.get_owned_items(user_id),
        state.appwrite.list_restaurants()
    )?;

    tracing::debug!(
        "User {}: allergen profile {}, {} owned items, {} restaurants",
        user_id,
        if profile.is_some() { "present" } else { "absent" },
        owned.len(),
        restaurants.len()
    );

    let restaurants = fetch_menus(Arc::clone(&state.appwrite), restaurants).await;

    let thumbnails: HashMap<String, Option<String>> = restaurants
        .iter()
        .map(|r| (r.id.clone(), r.thumbnail_url.clone()))
        .collect();

    let result = state
        .recommender
        .recommend(restaurants, profile.as_ref(), &owned, limit);

    let recommendations = result
        .recommendations
        .into_iter()
        .map(|rec| RecommendedRestaurant {
            thumbnail_url: thumbnails.get(&rec.restaurant_id).cloned().flatten(),
            restaurant_id: rec.restaurant_id,
            restaurant_name: rec.restaurant_name,
            categories: rec.categories,
        })
        .collect();

    Ok(RecommendResponse {
        recommendations,
        total_restaurants: result.total_restaurants,
    })
}

/// Load every restaurant's menu concurrently, keeping the input order
///
/// A restaurant whose menu cannot be fetched is left out.
async fn fetch_menus(appwrite: Arc<AppwriteClient>, restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    let mut tasks = JoinSet::new();

    for (index, restaurant) in restaurants.into_iter().enumerate() {
        let appwrite = Arc::clone(&appwrite);
        tasks.spawn(async move {
            let menu = appwrite.get_menu(&restaurant.id).await;
            match menu {
                Ok(menu) => Some((index, Restaurant { menu, ..restaurant })),
                Err(e) => {
                    tracing::warn!("Dropping restaurant {}: menu fetch failed: {}", restaurant.id, e);
                    None
                }
            }
        });
    }

    let mut loaded = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(entry)) => loaded.push(entry),
            Ok(None) => {}
            Err(e) => tracing::warn!("Menu fetch task failed: {}", e),
        }
    }

    loaded.sort_by_key(|(index, _)| *index);
    loaded.into_iter().map(|(_, restaurant)| restaurant).collect()
}

/// Filtered menu for a single restaurant
///
/// GET /api/v1/restaurants/{restaurantId}/menu?userId={userId}
async fn restaurant_menu(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MenuQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let restaurant_id = path.into_inner();
    let user_id = &query.user_id;

    let fetched = tokio::time::timeout(state.request_timeout, async {
        tokio::try_join!(
            state.appwrite.get_restaurant_with_menu(&restaurant_id),
            state.appwrite.get_allergen_profile(user_id),
            state.appwrite.get_owned_items(user_id)
        )
    })
    .await;

    let (restaurant, profile, owned) = match fetched {
        Ok(Ok(data)) => data,
        Ok(Err(AppwriteError::NotFound(message))) => {
            return error_response(StatusCode::NOT_FOUND, "Restaurant not found", message);
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to load menu {} for {}: {}", restaurant_id, user_id, e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch menu", e);
        }
        Err(_) => {
            return error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Request timed out",
                "Menu took too long to load",
            );
        }
    };

    let active = active_allergens(profile.as_ref());
    let owned_names = owned_item_names(&owned);
    let categories = filter_menu(restaurant.menu, &active, &owned_names);

    tracing::debug!(
        "Restaurant {} has {} safe categories for user {}",
        restaurant_id,
        categories.len(),
        user_id
    );

    HttpResponse::Ok().json(RestaurantMenuResponse {
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.name,
        thumbnail_url: restaurant.thumbnail_url,
        categories,
    })
}

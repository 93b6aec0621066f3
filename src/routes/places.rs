use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::filter_by_distance;
use crate::models::{Candidate, GeoCoordinate, NearbySearchRequest, NearbySearchResponse, PhotoQuery};
use crate::routes::{error_response, AppState};

/// Configure places proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/places/nearby", web::post().to(nearby_search))
        .route("/places/photo", web::get().to(place_photo));
}

/// Nearby restaurant search
///
/// POST /api/v1/places/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.7128,
///   "longitude": -74.0060,
///   "radiusMiles": 5,
///   "keyword": "thai"
/// }
/// ```
///
/// Candidates are sorted nearest first and bounded by the radius plus one mile.
async fn nearby_search(
    state: web::Data<AppState>,
    req: web::Json<NearbySearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let origin = GeoCoordinate::new(req.latitude, req.longitude);
    let radius_miles = state.search.resolve_radius(req.radius_miles);

    tracing::info!(
        "Nearby search at ({}, {}) within {} miles",
        origin.latitude,
        origin.longitude,
        radius_miles
    );

    let places = match state
        .places
        .nearby_restaurants(origin, radius_miles, req.keyword.as_deref())
        .await
    {
        Ok(places) => places,
        Err(e) => {
            tracing::error!("Nearby search failed: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Places search failed", e);
        }
    };

    let total = places.len();
    let candidates = filter_by_distance(
        origin,
        radius_miles,
        places.into_iter().map(Candidate::from).collect(),
    );

    tracing::debug!("{} of {} places within {} miles", candidates.len(), total, radius_miles);

    HttpResponse::Ok().json(NearbySearchResponse {
        total_results: candidates.len(),
        candidates,
    })
}

/// Photo proxy
///
/// GET /api/v1/places/photo?reference={photoReference}&maxWidth={px}
async fn place_photo(
    state: web::Data<AppState>,
    query: web::Query<PhotoQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.places.fetch_photo(&query.reference, query.max_width).await {
        Ok(photo) => HttpResponse::Ok()
            .content_type(photo.content_type)
            .body(photo.bytes),
        Err(e) => {
            tracing::warn!("Photo fetch failed for {}: {}", query.reference, e);
            error_response(StatusCode::BAD_GATEWAY, "Photo fetch failed", e)
        }
    }
}

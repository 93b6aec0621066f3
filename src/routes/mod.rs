// Route exports
pub mod places;
pub mod recommendations;

use actix_web::{http::StatusCode, web, HttpResponse};
use crate::config::SearchSettings;
use crate::core::Recommender;
use crate::models::ErrorResponse;
use crate::services::{AppwriteClient, PlacesClient};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub places: Arc<PlacesClient>,
    pub recommender: Recommender,
    pub search: SearchSettings,
    /// Upper bound on a whole fetch + filter pipeline
    pub request_timeout: Duration,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(places::configure),
    );
}

/// Build a JSON error response
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message.to_string(), status.as_u16()))
}

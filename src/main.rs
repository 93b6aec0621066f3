use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use menu_algo::config::{LoggingSettings, Settings};
use menu_algo::core::Recommender;
use menu_algo::routes::{self, AppState};
use menu_algo::services::{AppwriteClient, AppwriteCollections, PlacesClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so nothing is logged before this succeeds
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting menu recommendation service...");
    info!("Configuration loaded successfully (log level: {})", settings.logging.level);

    let collections = AppwriteCollections {
        restaurants: settings.collection.restaurants,
        menu_items: settings.collection.menu_items,
        users: settings.collection.users,
        saved_menus: settings.collection.saved_menus,
        created_menus: settings.collection.created_menus,
    };

    let appwrite = Arc::new(
        AppwriteClient::new(
            settings.appwrite.endpoint,
            settings.appwrite.api_key,
            settings.appwrite.project_id,
            settings.appwrite.database_id,
            collections,
        )
        .map_err(|e| io_error("Failed to create Appwrite client", e))?
        .with_page_limit(settings.collection.page_limit),
    );

    info!("Appwrite client initialized (page limit: {})", settings.collection.page_limit);

    let places_timeout = settings.places.timeout_secs.unwrap_or(10);
    let places = Arc::new(
        PlacesClient::new(settings.places.endpoint, settings.places.api_key, places_timeout)
            .map_err(|e| io_error("Failed to create places client", e))?,
    );

    info!("Places client initialized (timeout: {}s)", places_timeout);

    let recommender = Recommender::new(settings.recommendation.max_results);

    info!("Recommender initialized (max results: {:?})", recommender.max_results());

    let app_state = AppState {
        appwrite,
        places,
        recommender,
        search: settings.search,
        request_timeout: Duration::from_secs(settings.recommendation.timeout_secs),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

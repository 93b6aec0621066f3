use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub places: PlacesSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub restaurants: String,
    pub menu_items: String,
    pub users: String,
    pub saved_menus: String,
    pub created_menus: String,
    /// Documents requested per list call
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

fn default_page_limit() -> usize { crate::services::appwrite::DEFAULT_PAGE_LIMIT }

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSettings {
    #[serde(default = "default_places_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

fn default_places_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: f64,
    #[serde(default = "default_max_radius_miles")]
    pub max_radius_miles: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_miles: default_radius_miles(),
            max_radius_miles: default_max_radius_miles(),
        }
    }
}

impl SearchSettings {
    /// Resolve a requested radius: default when absent, clamped to the maximum
    pub fn resolve_radius(&self, requested: Option<f64>) -> f64 {
        requested
            .filter(|r| r.is_finite())
            .unwrap_or(self.default_radius_miles)
            .min(self.max_radius_miles)
    }
}

fn default_radius_miles() -> f64 { 5.0 }
fn default_max_radius_miles() -> f64 { 30.0 }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecommendationSettings {
    pub max_results: Option<usize>,
    #[serde(default = "default_recommendation_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_results: None,
            timeout_secs: default_recommendation_timeout(),
        }
    }
}

fn default_recommendation_timeout() -> u64 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENU_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENU__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MENU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MENU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Override secrets from their conventional environment variables
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let places_api_key = env::var("PLACES_API_KEY")
        .or_else(|_| env::var("GOOGLE_MAPS_API_KEY"))
        .ok();
    let appwrite_endpoint = env::var("APPWRITE_ENDPOINT").ok();
    let appwrite_api_key = env::var("APPWRITE_API_KEY").ok();
    let appwrite_project_id = env::var("APPWRITE_PROJECT_ID").ok();
    let log_level = env::var("LOG_LEVEL").ok();
    let log_format = env::var("LOG_FORMAT").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = places_api_key {
        builder = builder.set_override("places.api_key", key)?;
    }
    if let Some(endpoint) = appwrite_endpoint {
        builder = builder.set_override("appwrite.endpoint", endpoint)?;
    }
    if let Some(api_key) = appwrite_api_key {
        builder = builder.set_override("appwrite.api_key", api_key)?;
    }
    if let Some(project_id) = appwrite_project_id {
        builder = builder.set_override("appwrite.project_id", project_id)?;
    }
    if let Some(level) = log_level {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Some(format) = log_format {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

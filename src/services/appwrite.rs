use crate::models::{AllergenProfile, MenuCategory, MenuItem, Restaurant};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Documents requested per list call; Appwrite's own default is 25
pub const DEFAULT_PAGE_LIMIT: usize = 500;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Read-only access to the document store:
/// - Restaurants and their menu items
/// - User allergen profiles
/// - Items in a user's saved and created menus
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_limit: usize,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub restaurants: String,
    pub menu_items: String,
    pub users: String,
    pub saved_menus: String,
    pub created_menus: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Set how many documents each list call asks for
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    /// Issue an authenticated GET and return the JSON body
    async fn get_json(&self, url: &str) -> Result<Value, AppwriteError> {
        let response = self
            .client
            .get(url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppwriteError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Appwrite request failed: {} - {}", status, body);
            return Err(AppwriteError::ApiError(format!("Request failed: {}", status)));
        }

        Ok(response.json().await?)
    }

    /// List documents of a collection matching the given queries
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<Vec<Value>, AppwriteError> {
        let mut queries = queries.to_vec();
        queries.push(format!("limit({})", self.page_limit));

        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?;
        let url = format!(
            "{}?query={}",
            self.documents_url(collection),
            urlencoding::encode(&queries_json)
        );

        tracing::debug!("Listing documents from: {}", url);

        let mut json = self.get_json(&url).await?;

        match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => {
                if documents.len() >= self.page_limit {
                    tracing::warn!(
                        "Collection {} returned a full page of {} documents; later documents are not loaded",
                        collection,
                        documents.len()
                    );
                }
                Ok(documents)
            }
            _ => Err(AppwriteError::InvalidResponse("Missing documents array".into())),
        }
    }

    /// Fetch the restaurant list (without menus), in store order
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppwriteError> {
        let documents = self.list_documents(&self.collections.restaurants, &[]).await?;
        let restaurants: Vec<Restaurant> = parse_documents(documents, "restaurant");

        tracing::debug!("Fetched {} restaurants", restaurants.len());

        Ok(restaurants)
    }

    /// Fetch a single restaurant by document ID, without its menu
    pub async fn get_restaurant(&self, restaurant_id: &str) -> Result<Restaurant, AppwriteError> {
        let url = format!(
            "{}/{}",
            self.documents_url(&self.collections.restaurants),
            urlencoding::encode(restaurant_id)
        );

        let json = self.get_json(&url).await.map_err(|e| match e {
            AppwriteError::NotFound(_) => {
                AppwriteError::NotFound(format!("Restaurant {} not found", restaurant_id))
            }
            other => other,
        })?;

        let data = document_data(json);
        serde_json::from_value(data)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse restaurant: {}", e)))
    }

    /// Fetch a restaurant's menu, grouped by category
    pub async fn get_menu(&self, restaurant_id: &str) -> Result<Vec<MenuCategory>, AppwriteError> {
        let queries = vec![equal_query("restaurantId", restaurant_id)];
        let documents = self.list_documents(&self.collections.menu_items, &queries).await?;
        let items: Vec<MenuItem> = parse_documents(documents, "menu item");

        tracing::debug!("Restaurant {} has {} menu items", restaurant_id, items.len());

        Ok(MenuCategory::group(items))
    }

    /// Fetch a restaurant together with its menu
    pub async fn get_restaurant_with_menu(&self, restaurant_id: &str) -> Result<Restaurant, AppwriteError> {
        let (mut restaurant, menu) = tokio::try_join!(
            self.get_restaurant(restaurant_id),
            self.get_menu(restaurant_id)
        )?;
        restaurant.menu = menu;
        Ok(restaurant)
    }

    /// Fetch a user's allergen profile
    ///
    /// Returns `None` when the user has no profile document or no allergens field.
    pub async fn get_allergen_profile(&self, user_id: &str) -> Result<Option<AllergenProfile>, AppwriteError> {
        let queries = vec![equal_query("userId", user_id)];
        let documents = match self.list_documents(&self.collections.users, &queries).await {
            Ok(docs) => docs,
            Err(AppwriteError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(doc) = documents.into_iter().next() else {
            tracing::debug!("No profile document for user {}", user_id);
            return Ok(None);
        };

        let profile = match document_data(doc).get_mut("allergens").map(Value::take) {
            None | Some(Value::Null) => None,
            Some(allergens) => match serde_json::from_value::<AllergenProfile>(allergens) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Malformed allergen profile for user {}, ignoring: {}", user_id, e);
                    None
                }
            },
        };

        Ok(profile)
    }

    /// Fetch every item from the user's saved and created menus
    pub async fn get_owned_items(&self, user_id: &str) -> Result<Vec<MenuItem>, AppwriteError> {
        let (mut saved, created) = tokio::try_join!(
            self.get_menu_collection_items(&self.collections.saved_menus, user_id),
            self.get_menu_collection_items(&self.collections.created_menus, user_id)
        )?;

        saved.extend(created);

        tracing::debug!("User {} owns {} menu items", user_id, saved.len());

        Ok(saved)
    }

    async fn get_menu_collection_items(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<MenuItem>, AppwriteError> {
        let queries = vec![equal_query("userId", user_id)];
        let documents = match self.list_documents(collection, &queries).await {
            Ok(docs) => docs,
            Err(AppwriteError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let items = documents
            .into_iter()
            .filter_map(|doc| match document_data(doc).get_mut("items").map(Value::take) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .flatten()
            .collect::<Vec<Value>>();

        Ok(parse_documents(items, "owned item"))
    }
}

/// Build an `equal` query, quoting the value as a JSON string
fn equal_query(attribute: &str, value: &str) -> String {
    format!("equal(\"{}\", {})", attribute, Value::from(value))
}

/// Extract the field payload from an Appwrite document (`data` if nested)
fn document_data(mut doc: Value) -> Value {
    match doc.get_mut("data").map(Value::take) {
        Some(data @ Value::Object(_)) => data,
        _ => doc,
    }
}

/// Decode documents, skipping (and logging) any that fail to parse
fn parse_documents<T: DeserializeOwned>(documents: Vec<Value>, kind: &str) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match serde_json::from_value(document_data(doc)) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed {} document: {}", kind, e);
                None
            }
        })
        .collect()
}

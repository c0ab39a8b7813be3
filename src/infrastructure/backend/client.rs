//! REST adapter for the hosted backend's table API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, ItemRow};
use crate::domain::entities::{Category, CategoryFilter, ContentItem};
use crate::domain::errors::StoreError;
use crate::domain::ports::DataStorePort;

/// Default table holding preloadable items.
pub const DEFAULT_ITEMS_TABLE: &str = "listings";

const USER_AGENT: &str = concat!("shelfwarm/", env!("CARGO_PKG_VERSION"));

/// Data store backed by a PostgREST-style HTTP API.
pub struct RestDataStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl std::fmt::Debug for RestDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDataStore")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl RestDataStore {
    /// Creates a client for `base_url` authenticated with `api_key`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> StoreError {
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::unauthorized(error_message)
            }
            StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited,
            s if s.is_server_error() => StoreError::unavailable(error_message),
            _ => StoreError::unexpected(format!("unexpected response: {status} - {error_message}")),
        }
    }
}

/// Builds the query parameters for a category read.
#[must_use]
pub fn category_query(category: Category, limit: usize) -> Vec<(&'static str, String)> {
    let filter = match category.filter() {
        CategoryFilter::Exact => format!("eq.{}", category.label()),
        CategoryFilter::Contains => format!("ilike.*{}*", category.label()),
    };

    vec![
        ("select", "id,media_urls".to_string()),
        ("is_available", "eq.true".to_string()),
        ("category", filter),
        ("limit", limit.to_string()),
    ]
}

#[async_trait]
impl DataStorePort for RestDataStore {
    async fn list_available_items_by_category(
        &self,
        category: Category,
        limit: usize,
    ) -> Result<Vec<ContentItem>, StoreError> {
        debug!(category = %category, limit, "Querying available items");

        let response = self
            .client
            .get(self.endpoint())
            .query(&category_query(category, limit))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach data store");
                if e.is_timeout() {
                    StoreError::network("request timed out")
                } else if e.is_connect() {
                    StoreError::network("failed to connect to data store")
                } else {
                    StoreError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let rows: Vec<ItemRow> = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse item rows");
            StoreError::decode(e.to_string())
        })?;

        debug!(category = %category, rows = rows.len(), "Fetched item rows");

        Ok(rows.into_iter().take(limit).map(ContentItem::from).collect())
    }
}

//! HTTP adapter for the breed catalog and the secondary photo service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::dto::{BreedResponse, ImageResponse, RandomPhotoResponse};
use crate::domain::entities::{Breed, BreedId, Photo, PhotoId, PhotoSource};
use crate::domain::errors::ApiError;
use crate::domain::ports::{CatalogPort, SearchOrder};

const PRIMARY_API_BASE: &str = "https://api.thecatapi.com/v1";
const SECONDARY_API_BASE: &str = "https://cataas.com";

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the breed catalog service.
    pub primary_base_url: String,
    /// Base URL of the random-photo service.
    pub secondary_base_url: String,
    /// Optional API key sent as `x-api-key` on primary requests.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            primary_base_url: PRIMARY_API_BASE.to_string(),
            secondary_base_url: SECONDARY_API_BASE.to_string(),
            api_key: None,
            timeout_secs: 25,
        }
    }
}

/// Catalog client speaking to both upstream photo services.
pub struct CatApiClient {
    client: Client,
    config: ApiConfig,
}

impl CatApiClient {
    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ApiConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_config(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }
        request
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .request(url)
            .query(query)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Catalog request rejected");
            return Err(ApiError::http(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse catalog response");
            ApiError::decode(e.to_string())
        })
    }
}

#[async_trait]
impl CatalogPort for CatApiClient {
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        let url = format!("{}/breeds", self.config.primary_base_url);

        debug!("Fetching breed catalog");
        let breeds: Vec<BreedResponse> = self.get_json(&url, &[]).await?;
        debug!(count = breeds.len(), "Fetched breed catalog");

        Ok(breeds.into_iter().map(Breed::from).collect())
    }

    async fn search_photos(
        &self,
        breed: Option<&BreedId>,
        limit: usize,
        page: usize,
        order: SearchOrder,
    ) -> Result<Vec<Photo>, ApiError> {
        let url = format!("{}/images/search", self.config.primary_base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("limit", limit.to_string()),
            ("page", page.to_string()),
            ("order", order.as_query_value().to_string()),
            ("size", "small".to_string()),
            ("include_breeds", "1".to_string()),
        ];
        if let Some(breed) = breed {
            query.push(("breed_ids", breed.as_str().to_string()));
        }

        debug!(breed = ?breed.map(BreedId::as_str), limit, page, "Searching photos");
        let images: Vec<ImageResponse> = self.get_json(&url, &query).await?;

        Ok(images.into_iter().map(Photo::from).collect())
    }

    async fn photo_by_id(&self, id: &PhotoId) -> Result<Option<Photo>, ApiError> {
        let url = format!("{}/images/{}", self.config.primary_base_url, id.as_str());
        let query = [("include_breeds", "1".to_string())];

        debug!(id = %id, "Fetching photo detail");
        let response = self
            .request(&url)
            .query(&query)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(id = %id, "Photo not found");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(id = %id, status = %status, "Detail request rejected");
            return Err(ApiError::http(status.as_u16()));
        }

        let image: ImageResponse = response.json().await.map_err(|e| {
            warn!(id = %id, error = %e, "Failed to parse detail response");
            ApiError::decode(e.to_string())
        })?;

        Ok(Some(Photo::from(image)))
    }

    async fn random_secondary(&self) -> Result<Option<Photo>, ApiError> {
        let url = format!("{}/cat", self.config.secondary_base_url);
        let query = [("json", "true".to_string())];

        let random: RandomPhotoResponse = self.get_json(&url, &query).await?;
        if random.id.is_empty() {
            return Ok(None);
        }

        let photo_url = format!("{}/cat/{}", self.config.secondary_base_url, random.id);
        debug!(id = %random.id, "Fetched secondary photo");

        Ok(Some(
            Photo::new(random.id, Some(photo_url)).with_source(PhotoSource::SecondaryApi),
        ))
    }
}

fn map_request_error(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "Catalog request failed");
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::network("failed to connect to catalog service")
    } else {
        ApiError::network(e.to_string())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{EnrichmentError, ImageSearch};

const SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Photo search against the Pexels API
pub struct Pexels {
    api_key: String,
    search_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSource,
}

#[derive(Debug, Deserialize)]
struct PhotoSource {
    original: String,
}

impl Pexels {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.into(),
            search_url: SEARCH_URL.to_string(),
            http_client,
        }
    }

    /// Point the client at a different search endpoint.
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }
}

fn first_photo(response: SearchResponse) -> Option<String> {
    response.photos.into_iter().next().map(|photo| photo.src.original)
}

#[async_trait]
impl ImageSearch for Pexels {
    async fn resolve_image(&self, city: &str, state: &str) -> Result<String, EnrichmentError> {
        let query = format!("{city} {state}");
        debug!(query = %query, "Searching Pexels");

        let response = self
            .http_client
            .get(&self.search_url)
            .header("Authorization", &self.api_key)
            .query(&[("query", query.as_str()), ("per_page", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Upstream {
                service: "pexels",
                status: response.status(),
            });
        }

        let body: SearchResponse = response.json().await?;
        first_photo(body).ok_or(EnrichmentError::NotFound(query))
    }
}

use crate::domain::model::{DetailsResponse, SearchResponse};
use crate::domain::ports::{NearbyRequest, PlacesApi};
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
const REQUEST_TIMEOUT_SECS: u64 = 15;
const DETAILS_FIELDS: &str = "rating,user_ratings_total,reviews";

/// Google Places web service 的 HTTP 客戶端
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
}

impl GooglePlacesClient {
    pub fn new(base_url: &str, api_key: String, language: &str, region: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language: language.to_string(),
            region: region.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        tracing::debug!("Making Places request to: {}", url);

        params.push(("key", self.api_key.clone()));
        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        tracing::debug!("Places response status: {}", status);
        if !status.is_success() {
            return Err(EnrichError::PlacesError {
                message: format!("{} returned HTTP {}", endpoint, status),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn nearby_search(&self, request: &NearbyRequest) -> Result<SearchResponse> {
        let mut params = vec![
            ("location", format!("{},{}", request.lat, request.lon)),
            ("radius", request.radius.to_string()),
            ("language", self.language.clone()),
            ("region", self.region.clone()),
            ("keyword", request.keyword.clone()),
        ];
        if let Some(place_type) = request.place_type {
            params.push(("type", place_type.to_string()));
        }

        self.get_json("nearbysearch", params).await
    }

    async fn text_search(&self, query: &str) -> Result<SearchResponse> {
        let params = vec![
            ("query", query.to_string()),
            ("language", self.language.clone()),
            ("region", self.region.clone()),
        ];

        self.get_json("textsearch", params).await
    }

    async fn place_details(&self, place_id: &str) -> Result<DetailsResponse> {
        let params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
            ("language", self.language.clone()),
        ];

        self.get_json("details", params).await
    }
}

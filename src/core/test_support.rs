use crate::domain::model::{
    Candidate, DetailsResponse, Geometry, LatLng, PlaceDetails, PoiRecord, Review, SearchResponse,
};
use crate::domain::ports::{ConfigProvider, NearbyRequest, PlacesApi, Storage};
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const LAT: f64 = 45.4642;
pub const LON: f64 = 9.19;

/// 腳本化的地點服務：`None` 代表請求失敗
#[derive(Default)]
pub struct MockPlaces {
    pub nearby: Option<SearchResponse>,
    pub text: Option<SearchResponse>,
    pub details: Option<DetailsResponse>,
    pub latency: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl MockPlaces {
    pub async fn calls(&self, prefix: &str) -> usize {
        let calls = self.calls.lock().await;
        calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    async fn respond<T: Clone>(&self, call: String, response: &Option<T>) -> Result<T> {
        self.calls.lock().await.push(call);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        response.clone().ok_or_else(|| EnrichError::PlacesError {
            message: "connection reset".to_string(),
        })
    }
}

#[async_trait]
impl PlacesApi for MockPlaces {
    async fn nearby_search(&self, request: &NearbyRequest) -> Result<SearchResponse> {
        self.respond(format!("nearby:{}", request.keyword), &self.nearby)
            .await
    }

    async fn text_search(&self, query: &str) -> Result<SearchResponse> {
        self.respond(format!("text:{}", query), &self.text).await
    }

    async fn place_details(&self, place_id: &str) -> Result<DetailsResponse> {
        self.respond(format!("details:{}", place_id), &self.details)
            .await
    }
}

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: &str, content: &str) {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), content.to_string());
    }

    pub async fn get_file(&self, path: &str) -> Option<String> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn read_to_string(&self, path: &str) -> Result<Option<String>> {
        Ok(self.get_file(path).await)
    }

    async fn append_line(&mut self, path: &str, line: &str) -> Result<()> {
        let mut files = self.files.lock().await;
        let content = files.entry(path.to_string()).or_default();
        content.push_str(line);
        content.push('\n');
        Ok(())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), String::from_utf8_lossy(data).into_owned());
        Ok(())
    }
}

pub struct MockConfig {
    pub sample: usize,
    pub poi_timeout_secs: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            sample: 0,
            poi_timeout_secs: 45,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn input_path(&self) -> &str {
        "in.jsonl"
    }

    fn output_path(&self) -> &str {
        "out.jsonl"
    }

    fn report_path(&self) -> &str {
        "report.json"
    }

    fn radius(&self) -> u32 {
        150
    }

    fn qps(&self) -> f64 {
        1000.0
    }

    fn sample(&self) -> usize {
        self.sample
    }

    fn poi_timeout_secs(&self) -> u64 {
        self.poi_timeout_secs
    }

    fn base_url(&self) -> &str {
        "http://localhost"
    }

    fn language(&self) -> &str {
        "it"
    }

    fn region(&self) -> &str {
        "it"
    }
}

pub fn poi(name: &str) -> PoiRecord {
    PoiRecord {
        poi_id: serde_json::json!("poi-1"),
        name: name.to_string(),
        lat: LAT,
        lon: LON,
        category: "cafe".to_string(),
        address_full: "Corso Magenta 10".to_string(),
        city: "Milano".to_string(),
        extra: BTreeMap::new(),
    }
}

/// 位於測試 POI 正北方指定公尺處的候選地點
pub fn candidate_north(place_id: &str, name: &str, meters: f64) -> Candidate {
    Candidate {
        place_id: place_id.to_string(),
        name: name.to_string(),
        geometry: Some(Geometry {
            location: Some(LatLng {
                lat: LAT + meters / 111_194.93,
                lng: LON,
            }),
        }),
    }
}

pub fn ok(results: Vec<Candidate>) -> Option<SearchResponse> {
    Some(SearchResponse {
        status: "OK".to_string(),
        results,
    })
}

pub fn status(status: &str) -> Option<SearchResponse> {
    Some(SearchResponse {
        status: status.to_string(),
        results: vec![],
    })
}

pub fn details_ok() -> Option<DetailsResponse> {
    Some(DetailsResponse {
        status: "OK".to_string(),
        result: Some(PlaceDetails {
            rating: Some(4.6),
            user_ratings_total: Some(812),
            reviews: Some(vec![
                Review {
                    rating: 5.0,
                    text: Some("Cappuccino   perfetto".to_string()),
                },
                Review {
                    rating: 2.0,
                    text: Some("Troppo affollato la domenica mattina".to_string()),
                },
            ]),
        }),
    })
}

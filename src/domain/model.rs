use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_CATEGORY: &str = "unknown";
pub const DEFAULT_CITY: &str = "Milano";
pub const SOURCE_NAME: &str = "google_places";

const ENRICHMENT_FIELDS: &[&str] = &[
    "rating",
    "reviews_count",
    "top_review_snippet",
    "rating_confidence",
    "last_verified_utc",
    "source",
    "source_id",
];

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

/// 明確的 `null` 與缺少欄位一樣，回到型別預設值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

fn null_as_city<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_city))
}

/// 一筆 POI 輸入紀錄，未知欄位原樣保留並寫回輸出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    #[serde(default)]
    pub poi_id: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_category", deserialize_with = "null_as_category")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address_full: String,
    #[serde(default = "default_city", deserialize_with = "null_as_city")]
    pub city: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PoiRecord {
    /// 日誌用的識別字串
    pub fn id_key(&self) -> String {
        id_key(&self.poi_id)
    }

    pub fn resume_key(&self) -> Option<String> {
        resume_key(&self.poi_id)
    }
}

pub fn id_key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 續跑比對用的鍵：保留 JSON 型別，字串 `"7"` 與數字 `7` 不同；沒有 id 的紀錄不參與續跑
pub fn resume_key(value: &serde_json::Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    /// high / medium 才會帶出來源資訊
    pub fn carries_provenance(&self) -> bool {
        matches!(self, Confidence::High | Confidence::Medium)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

/// 搜尋 API 回傳的單一候選地點
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Candidate {
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().and_then(|g| g.location)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Candidate>,
}

impl SearchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Option<Vec<Review>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

impl DetailsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// 每筆 POI 的比對結果，建立後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub best: Option<Candidate>,
    pub score: f64,
    pub distance: Option<f64>,
    pub confidence: Confidence,
    pub enrichment: Enrichment,
    pub had_any_ok: bool,
    pub used_text_fallback: bool,
    pub timed_out: bool,
    pub api_errors: u64,
}

impl MatchOutcome {
    pub fn is_zero_result(&self) -> bool {
        !self.timed_out && !self.had_any_ok
    }
}

/// 寫回紀錄的補充欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    pub top_review_snippet: String,
    pub source_id: Option<String>,
}

/// 輸出檔中的一行：原始 POI 加上補充欄位
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub poi: PoiRecord,
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    pub top_review_snippet: String,
    pub rating_confidence: Confidence,
    pub last_verified_utc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl EnrichedRecord {
    pub fn new(mut poi: PoiRecord, outcome: &MatchOutcome, verified_at: String) -> Self {
        // 輸入若已帶有補充欄位（例如重跑舊輸出），以本次結果為準
        for key in ENRICHMENT_FIELDS {
            poi.extra.remove(*key);
        }

        let provenance = outcome
            .enrichment
            .source_id
            .clone()
            .filter(|_| outcome.confidence.carries_provenance());

        Self {
            poi,
            rating: outcome.enrichment.rating,
            reviews_count: outcome.enrichment.reviews_count,
            top_review_snippet: outcome.enrichment.top_review_snippet.clone(),
            rating_confidence: outcome.confidence,
            last_verified_utc: verified_at,
            source: provenance.as_ref().map(|_| SOURCE_NAME.to_string()),
            source_id: provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_record_defaults() {
        let poi: PoiRecord =
            serde_json::from_str(r#"{"poi_id": "p1", "lat": 45.46, "lon": 9.19}"#).unwrap();
        assert_eq!(poi.category, "unknown");
        assert_eq!(poi.city, "Milano");
        assert_eq!(poi.name, "");
        assert_eq!(poi.address_full, "");
        assert!(poi.extra.is_empty());
    }

    #[test]
    fn test_poi_record_preserves_unknown_fields() {
        let line = r#"{"poi_id": 7, "lat": 45.0, "lon": 9.0, "osm_tags": {"amenity": "cafe"}}"#;
        let poi: PoiRecord = serde_json::from_str(line).unwrap();
        assert_eq!(poi.id_key(), "7");
        assert!(poi.extra.contains_key("osm_tags"));

        let back = serde_json::to_value(&poi).unwrap();
        assert_eq!(back["osm_tags"]["amenity"], "cafe");
    }

    #[test]
    fn test_id_key_normalizes_strings_and_numbers() {
        assert_eq!(id_key(&serde_json::json!("abc")), "abc");
        assert_eq!(id_key(&serde_json::json!(42)), "42");
    }

    #[test]
    fn test_candidate_without_geometry_has_no_location() {
        let cand: Candidate = serde_json::from_str(r#"{"place_id": "x", "name": "Bar"}"#).unwrap();
        assert!(cand.location().is_none());

        let cand: Candidate = serde_json::from_str(
            r#"{"place_id": "x", "name": "Bar", "geometry": {"location": {"lat": 1.0, "lng": 2.0}}}"#,
        )
        .unwrap();
        assert_eq!(cand.location(), Some(LatLng { lat: 1.0, lng: 2.0 }));
    }

    #[test]
    fn test_enriched_record_withholds_provenance_for_low_confidence() {
        let poi: PoiRecord =
            serde_json::from_str(r#"{"poi_id": "p1", "lat": 45.0, "lon": 9.0}"#).unwrap();
        let outcome = MatchOutcome {
            best: None,
            score: 0.3,
            distance: Some(900.0),
            confidence: Confidence::Low,
            enrichment: Enrichment {
                rating: Some(4.1),
                reviews_count: Some(10),
                top_review_snippet: "ok".to_string(),
                source_id: Some("place-1".to_string()),
            },
            had_any_ok: true,
            used_text_fallback: false,
            timed_out: false,
            api_errors: 0,
        };

        let record = EnrichedRecord::new(poi, &outcome, "2024-01-01T00:00:00Z".to_string());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["rating_confidence"], "low");
        assert_eq!(value["rating"], 4.1);
        assert!(value.get("source").is_none());
        assert!(value.get("source_id").is_none());
    }

    #[test]
    fn test_null_optional_fields_fall_back_to_defaults() {
        let line = r#"{"poi_id": "b", "name": null, "lat": 45.0, "lon": 9.0, "category": null, "address_full": null, "city": null}"#;
        let poi: PoiRecord = serde_json::from_str(line).unwrap();
        assert_eq!(poi.name, "");
        assert_eq!(poi.category, "unknown");
        assert_eq!(poi.address_full, "");
        assert_eq!(poi.city, "Milano");
        assert!(poi.extra.is_empty());
    }

    #[test]
    fn test_resume_key_keeps_json_type() {
        assert_eq!(resume_key(&serde_json::json!("7")).as_deref(), Some("\"7\""));
        assert_eq!(resume_key(&serde_json::json!(7)).as_deref(), Some("7"));
        assert_eq!(resume_key(&serde_json::Value::Null), None);

        let poi: PoiRecord = serde_json::from_str(r#"{"lat": 45.0, "lon": 9.0}"#).unwrap();
        assert!(poi.poi_id.is_null());
        assert_eq!(poi.resume_key(), None);
    }

    #[test]
    fn test_malformed_candidate_does_not_spoil_response() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"place_id": "good", "name": "Bar Magenta", "geometry": {"location": {"lat": 45.46, "lng": 9.19}}},
                {"place_id": null, "name": null, "geometry": {"location": {"lat": 45.47}}}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].name, "Bar Magenta");
        assert_eq!(response.results[1].name, "");
        assert_eq!(response.results[1].place_id, "");
        assert_eq!(
            response.results[1].location(),
            Some(LatLng { lat: 45.47, lng: 0.0 })
        );
    }

    #[test]
    fn test_review_with_null_rating_parses() {
        let body = r#"{"status": "OK", "result": {"rating": null, "reviews": [{"rating": null, "text": "Buono"}, {"rating": 4, "text": null}]}}"#;
        let response: DetailsResponse = serde_json::from_str(body).unwrap();
        let reviews = response.result.unwrap().reviews.unwrap();
        assert_eq!(reviews[0].rating, 0.0);
        assert_eq!(reviews[1].rating, 4.0);
        assert!(reviews[1].text.is_none());
    }
}

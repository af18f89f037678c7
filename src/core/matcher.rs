use crate::core::category::{category_profile, proximity_keyword};
use crate::core::confidence::classify;
use crate::core::scorer::score_candidate;
use crate::core::similarity::token_similarity;
use crate::core::snippet::best_snippet;
use crate::domain::model::{
    Candidate, Confidence, DetailsResponse, Enrichment, MatchOutcome, PoiRecord, SearchResponse,
};
use crate::domain::ports::{NearbyRequest, PlacesApi};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// 附近搜尋最佳分數低於此值時改用文字搜尋
pub const FALLBACK_THRESHOLD: f64 = 0.5;
const MIN_QPS: f64 = 0.5;

/// 單筆 POI 的處理階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ProximitySearch,
    TextSearchFallback,
    DetailsLookup,
    Done,
    TimedOut,
}

/// 搜尋階段結束後的下一個階段；逾時檢查優先於其他轉移
pub fn next_stage(stage: Stage, best_score: f64, has_best: bool, expired: bool) -> Stage {
    match stage {
        Stage::ProximitySearch | Stage::TextSearchFallback if expired => Stage::TimedOut,
        Stage::ProximitySearch if best_score < FALLBACK_THRESHOLD => Stage::TextSearchFallback,
        Stage::ProximitySearch | Stage::TextSearchFallback if has_best => Stage::DetailsLookup,
        Stage::ProximitySearch | Stage::TextSearchFallback | Stage::DetailsLookup => Stage::Done,
        Stage::Done => Stage::Done,
        Stage::TimedOut => Stage::TimedOut,
    }
}

/// 每筆 POI 的時間預算
#[derive(Debug, Clone, Copy)]
pub struct PoiDeadline {
    started: Instant,
    budget: Duration,
}

impl PoiDeadline {
    pub fn start(budget: Duration) -> Self {
        Self::starting_at(Instant::now(), budget)
    }

    pub fn starting_at(started: Instant, budget: Duration) -> Self {
        Self { started, budget }
    }

    pub fn expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) > self.budget
    }

    pub fn expired(&self) -> bool {
        self.expired_at(Instant::now())
    }
}

/// 每次未命中快取的請求之後固定等待
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn from_qps(qps: f64) -> Self {
        Self {
            delay: Duration::from_secs_f64(1.0 / qps.max(MIN_QPS)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProximityKey {
    lat_e6: i64,
    lon_e6: i64,
    name: String,
    category: String,
}

impl ProximityKey {
    fn new(poi: &PoiRecord) -> Self {
        Self {
            lat_e6: (poi.lat * 1e6).round() as i64,
            lon_e6: (poi.lon * 1e6).round() as i64,
            name: poi.name.clone(),
            category: poi.category.clone(),
        }
    }
}

pub fn text_query(poi: &PoiRecord) -> String {
    format!("{}, {}, {}", poi.name, poi.address_full, poi.city)
}

#[derive(Debug, Clone)]
struct BestCandidate {
    candidate: Candidate,
    score: f64,
    distance: Option<f64>,
}

/// 單筆 POI 處理中的可變狀態
#[derive(Debug, Default)]
struct MatchState {
    best: Option<BestCandidate>,
    had_any_ok: bool,
    used_text_fallback: bool,
    api_errors: u64,
    confidence: Option<Confidence>,
    enrichment: Enrichment,
}

impl MatchState {
    fn best_score(&self) -> f64 {
        self.best.as_ref().map(|b| b.score).unwrap_or(0.0)
    }

    /// 只有 status 為 OK 的回應會被計分
    fn absorb(&mut self, poi: &PoiRecord, response: &SearchResponse) -> bool {
        if !response.is_ok() {
            return false;
        }
        self.had_any_ok = true;

        for candidate in &response.results {
            let (score, distance) = score_candidate(poi, candidate);
            if score > self.best_score() {
                self.best = Some(BestCandidate {
                    candidate: candidate.clone(),
                    score,
                    distance,
                });
            }
        }
        true
    }

    fn into_outcome(self, timed_out: bool) -> MatchOutcome {
        let (best, score, distance) = match self.best {
            Some(b) => (Some(b.candidate), b.score, b.distance),
            None => (None, 0.0, None),
        };

        MatchOutcome {
            best,
            score,
            distance,
            confidence: if timed_out {
                Confidence::Low
            } else {
                self.confidence.unwrap_or(Confidence::Low)
            },
            enrichment: if timed_out {
                Enrichment::default()
            } else {
                self.enrichment
            },
            had_any_ok: self.had_any_ok,
            used_text_fallback: self.used_text_fallback,
            timed_out,
            api_errors: self.api_errors,
        }
    }
}

/// 兩段式比對管線，快取在整個執行期間有效
pub struct Matcher<A: PlacesApi> {
    api: A,
    throttle: Throttle,
    radius: u32,
    poi_timeout: Duration,
    nearby_cache: HashMap<ProximityKey, SearchResponse>,
    text_cache: HashMap<String, SearchResponse>,
    details_cache: HashMap<String, DetailsResponse>,
}

impl<A: PlacesApi> Matcher<A> {
    pub fn new(api: A, radius: u32, qps: f64, poi_timeout: Duration) -> Self {
        Self {
            api,
            throttle: Throttle::from_qps(qps),
            radius,
            poi_timeout,
            nearby_cache: HashMap::new(),
            text_cache: HashMap::new(),
            details_cache: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    /// (附近搜尋, 文字搜尋, 詳細資料) 快取筆數
    pub fn cache_sizes(&self) -> (usize, usize, usize) {
        (
            self.nearby_cache.len(),
            self.text_cache.len(),
            self.details_cache.len(),
        )
    }

    pub async fn match_poi(&mut self, poi: &PoiRecord) -> MatchOutcome {
        let deadline = PoiDeadline::start(self.poi_timeout);
        let mut state = MatchState::default();
        let mut stage = Stage::ProximitySearch;

        loop {
            stage = match stage {
                Stage::ProximitySearch => {
                    match self.proximity_search(poi).await {
                        Ok(response) => {
                            state.absorb(poi, &response);
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ Nearby search failed for {}: {}", poi.id_key(), e);
                            state.api_errors += 1;
                        }
                    }
                    next_stage(
                        stage,
                        state.best_score(),
                        state.best.is_some(),
                        deadline.expired(),
                    )
                }
                Stage::TextSearchFallback => {
                    match self.text_search(poi).await {
                        Ok(response) => {
                            if state.absorb(poi, &response) {
                                state.used_text_fallback = true;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ Text search failed for {}: {}", poi.id_key(), e);
                            state.api_errors += 1;
                        }
                    }
                    next_stage(
                        stage,
                        state.best_score(),
                        state.best.is_some(),
                        deadline.expired(),
                    )
                }
                Stage::DetailsLookup => {
                    self.lookup_details(poi, &mut state).await;
                    next_stage(stage, state.best_score(), state.best.is_some(), false)
                }
                Stage::Done => return state.into_outcome(false),
                Stage::TimedOut => {
                    tracing::warn!(
                        "⏱️ POI {} exceeded its {:?} budget, writing empty enrichment",
                        poi.id_key(),
                        self.poi_timeout
                    );
                    return state.into_outcome(true);
                }
            };
        }
    }

    async fn lookup_details(&mut self, poi: &PoiRecord, state: &mut MatchState) {
        let Some(best) = state.best.clone() else {
            return;
        };
        let place_id = best.candidate.place_id.clone();

        match self.place_details(&place_id).await {
            Ok(response) if response.is_ok() => {
                let details = response.result.unwrap_or_default();
                let reviews = details.reviews.unwrap_or_default();

                state.enrichment.rating = details.rating;
                state.enrichment.reviews_count = details.user_ratings_total;
                state.enrichment.top_review_snippet = best_snippet(&reviews);

                // 信心等級重新計算名稱相似度，不沿用加總分數
                let sim = token_similarity(&poi.name, &best.candidate.name);
                let confidence = classify(best.distance, sim);
                if confidence.carries_provenance() {
                    state.enrichment.source_id = Some(place_id);
                }
                state.confidence = Some(confidence);
            }
            Ok(response) => {
                tracing::debug!(
                    "Details for {} returned status {}",
                    place_id,
                    response.status
                );
            }
            Err(e) => {
                tracing::warn!("⚠️ Place details failed for {}: {}", place_id, e);
                state.api_errors += 1;
            }
        }
    }

    async fn proximity_search(&mut self, poi: &PoiRecord) -> Result<SearchResponse> {
        let key = ProximityKey::new(poi);
        if let Some(cached) = self.nearby_cache.get(&key) {
            tracing::debug!("Nearby cache hit for {}", poi.id_key());
            return Ok(cached.clone());
        }

        let profile = category_profile(&poi.category);
        let request = NearbyRequest {
            lat: poi.lat,
            lon: poi.lon,
            radius: self.radius,
            keyword: proximity_keyword(&poi.name, &poi.category),
            place_type: profile.place_type,
        };

        let result = self.api.nearby_search(&request).await;
        self.throttle.wait().await;
        let response = result?;

        self.nearby_cache.insert(key, response.clone());
        Ok(response)
    }

    async fn text_search(&mut self, poi: &PoiRecord) -> Result<SearchResponse> {
        let query = text_query(poi);
        if let Some(cached) = self.text_cache.get(&query) {
            tracing::debug!("Text cache hit for '{}'", query);
            return Ok(cached.clone());
        }

        let result = self.api.text_search(&query).await;
        self.throttle.wait().await;
        let response = result?;

        self.text_cache.insert(query, response.clone());
        Ok(response)
    }

    async fn place_details(&mut self, place_id: &str) -> Result<DetailsResponse> {
        if let Some(cached) = self.details_cache.get(place_id) {
            tracing::debug!("Details cache hit for {}", place_id);
            return Ok(cached.clone());
        }

        let result = self.api.place_details(place_id).await;
        self.throttle.wait().await;
        let response = result?;

        self.details_cache
            .insert(place_id.to_string(), response.clone());
        Ok(response)
    }
}

use crate::domain::model::MatchOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounter {
    pub count: u64,
    pub rated_count: u64,
}

/// 整個執行期間累加的覆蓋率統計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageStats {
    pub with_rating: u64,
    pub with_reviews: u64,
    pub by_category: BTreeMap<String, CategoryCounter>,
    pub api_errors: u64,
    pub zero_results: u64,
    pub used_text_fallback: u64,
}

impl CoverageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: &str, outcome: &MatchOutcome) {
        let counter = self.by_category.entry(category.to_string()).or_default();
        counter.count += 1;

        self.api_errors += outcome.api_errors;
        if outcome.used_text_fallback {
            self.used_text_fallback += 1;
        }
        if outcome.is_zero_result() {
            self.zero_results += 1;
        }
        if outcome.enrichment.rating.is_some() {
            self.with_rating += 1;
            counter.rated_count += 1;
        }
        if outcome.enrichment.reviews_count.unwrap_or(0) > 0 {
            self.with_reviews += 1;
        }
    }

    pub fn finalize(&self, total_poi: usize) -> QualityReport {
        QualityReport {
            total_poi,
            with_rating_percentage: ratio(self.with_rating, total_poi as u64),
            with_reviews_percentage: ratio(self.with_reviews, total_poi as u64),
            coverage_by_category: self
                .by_category
                .iter()
                .map(|(category, counter)| {
                    (category.clone(), ratio(counter.rated_count, counter.count))
                })
                .collect(),
            api_errors: self.api_errors,
            zero_results: self.zero_results,
            used_text_fallback: self.used_text_fallback,
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    round4(part as f64 / whole.max(1) as f64)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 執行結束時寫出的品質報告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_poi: usize,
    pub with_rating_percentage: f64,
    pub with_reviews_percentage: f64,
    pub coverage_by_category: BTreeMap<String, f64>,
    pub api_errors: u64,
    pub zero_results: u64,
    pub used_text_fallback: u64,
}

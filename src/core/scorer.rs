use crate::core::similarity::{distance_meters, token_similarity};
use crate::domain::model::{Candidate, PoiRecord};

pub const NEAR_DISTANCE_M: f64 = 200.0;
pub const VERY_NEAR_DISTANCE_M: f64 = 100.0;
pub const NAME_MATCH_SIM: f64 = 0.75;
pub const STRONG_NAME_MATCH_SIM: f64 = 0.85;

/// 由距離與名稱相似度累加出的比對分數，上限 1.0
pub fn additive_score(distance: f64, name_sim: f64) -> f64 {
    let mut score = 0.0;
    if distance <= NEAR_DISTANCE_M {
        score += 0.6;
        if distance <= VERY_NEAR_DISTANCE_M {
            score += 0.1;
        }
    }
    if name_sim >= NAME_MATCH_SIM {
        score += 0.3;
        if name_sim >= STRONG_NAME_MATCH_SIM {
            score += 0.1;
        }
    }
    f64::min(score, 1.0)
}

/// 為候選地點打分，回傳 (分數, 距離)
///
/// 沒有座標的候選地點得 0 分且距離為 `None`。
pub fn score_candidate(poi: &PoiRecord, candidate: &Candidate) -> (f64, Option<f64>) {
    let Some(location) = candidate.location() else {
        return (0.0, None);
    };

    let distance = distance_meters(poi.lat, poi.lon, location.lat, location.lng);
    let name_sim = token_similarity(&poi.name, &candidate.name);
    (additive_score(distance, name_sim), Some(distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Geometry, LatLng};
    use std::collections::BTreeMap;

    fn poi(name: &str, lat: f64, lon: f64) -> PoiRecord {
        PoiRecord {
            poi_id: serde_json::json!("p1"),
            name: name.to_string(),
            lat,
            lon,
            category: "cafe".to_string(),
            address_full: String::new(),
            city: "Milano".to_string(),
            extra: BTreeMap::new(),
        }
    }

    fn candidate(name: &str, lat: f64, lng: f64) -> Candidate {
        Candidate {
            place_id: "place".to_string(),
            name: name.to_string(),
            geometry: Some(Geometry {
                location: Some(LatLng { lat, lng }),
            }),
        }
    }

    // 緯度每度約 111,195 公尺
    fn north_of(lat: f64, meters: f64) -> f64 {
        lat + meters / 111_194.93
    }

    #[test]
    fn test_additive_score_caps_at_one() {
        assert_eq!(additive_score(50.0, 0.90), 1.0);
        assert_eq!(additive_score(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_additive_score_steps() {
        assert!((additive_score(150.0, 0.0) - 0.6).abs() < 1e-12);
        assert!((additive_score(100.0, 0.0) - 0.7).abs() < 1e-12);
        assert!((additive_score(500.0, 0.75) - 0.3).abs() < 1e-12);
        assert!((additive_score(500.0, 0.85) - 0.4).abs() < 1e-12);
        assert!((additive_score(150.0, 0.80) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_candidate_at_50m_with_high_similarity_scores_one() {
        let p = poi("Bar Uno Due Tre Quattro Cinque Sei Sette Otto Nove", 45.4642, 9.19);
        let c = candidate(
            "Bar Uno Due Tre Quattro Cinque Sei Sette Otto Dieci",
            north_of(45.4642, 50.0),
            9.19,
        );
        assert!((token_similarity(&p.name, &c.name) - 0.90).abs() < 1e-12);

        let (score, distance) = score_candidate(&p, &c);
        assert_eq!(score, 1.0);
        assert!((distance.unwrap() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_far_unrelated_candidate_scores_zero() {
        let p = poi("Bar Magenta", 45.4642, 9.19);
        let c = candidate("Libreria Hoepli", north_of(45.4642, 500.0), 9.19);
        let (score, distance) = score_candidate(&p, &c);
        assert_eq!(score, 0.0);
        assert!(distance.unwrap() > 499.0);
    }

    #[test]
    fn test_candidate_without_location_scores_zero() {
        let p = poi("Bar Magenta", 45.4642, 9.19);
        let c = Candidate {
            place_id: "x".to_string(),
            name: "Bar Magenta".to_string(),
            geometry: None,
        };
        assert_eq!(score_candidate(&p, &c), (0.0, None));
    }
}

use crate::domain::model::Confidence;

const HIGH_MAX_DISTANCE_M: f64 = 100.0;
const HIGH_MIN_SIM: f64 = 0.80;
const MEDIUM_MAX_DISTANCE_M: f64 = 200.0;
const MEDIUM_MIN_SIM: f64 = 0.75;

/// 依距離與名稱相似度判定信心等級，規則依序比對
///
/// high 需要距離與名稱同時成立，medium 只需其一。
pub fn classify(distance: Option<f64>, similarity: f64) -> Confidence {
    let Some(distance) = distance else {
        return Confidence::Low;
    };

    if distance <= HIGH_MAX_DISTANCE_M && similarity >= HIGH_MIN_SIM {
        Confidence::High
    } else if distance <= MEDIUM_MAX_DISTANCE_M || similarity >= MEDIUM_MIN_SIM {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

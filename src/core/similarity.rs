use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 地球平均半徑（公尺）
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine 球面距離（公尺）
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = lat1.to_radians();
    let p2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("token pattern is valid"))
}

fn tokens(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// 名稱相似度：交集大小除以兩個 token 集合大小的平均值
///
/// 任一邊沒有英數 token 時回傳 0.0。
pub fn token_similarity(a: &str, b: &str) -> f64 {
    let sa = tokens(a);
    let sb = tokens(b);
    if sa.is_empty() || sb.is_empty() {
        return 0.0;
    }

    let inter = sa.intersection(&sb).count() as f64;
    let denom = (sa.len() + sb.len()) as f64 / 2.0;
    inter / denom
}

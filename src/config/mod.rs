#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative_float, validate_path,
    validate_positive_number, validate_url,
};

pub const DEFAULT_INPUT: &str = "poi_milano.jsonl";
pub const DEFAULT_OUTPUT: &str = "poi_milano_enriched.jsonl";
pub const DEFAULT_REPORT: &str = "report_quality_v2.json";
pub const DEFAULT_RADIUS: u32 = 150;
pub const DEFAULT_QPS: f64 = 3.0;
pub const DEFAULT_POI_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_LANGUAGE: &str = "it";
pub const DEFAULT_REGION: &str = "it";

/// 所有配置來源共用的檢查
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("input", config.input_path())?;
    validate_path("out", config.output_path())?;
    validate_path("report", config.report_path())?;
    validate_url("base_url", config.base_url())?;
    validate_positive_number("radius", u64::from(config.radius()), 1)?;
    // qps 低於 0.5 時由節流器套用下限；timeout 為 0 代表每筆只做第一次搜尋
    validate_non_negative_float("qps", config.qps())?;
    validate_non_empty_string("language", config.language())?;
    validate_non_empty_string("region", config.region())?;
    Ok(())
}

use crate::adapters::places::DEFAULT_BASE_URL;
use crate::config::{
    validate_provider, DEFAULT_INPUT, DEFAULT_LANGUAGE, DEFAULT_OUTPUT, DEFAULT_REGION,
    DEFAULT_REPORT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "poi-enrich")]
#[command(about = "Enrich POIs with ratings and reviews from Google Places")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: String,

    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub out: String,

    #[arg(long, default_value = DEFAULT_REPORT)]
    pub report: String,

    #[arg(long, default_value = "150", help = "Nearby search radius in meters")]
    pub radius: u32,

    #[arg(long, default_value = "3.0", help = "Request rate ceiling (queries/second)")]
    pub qps: f64,

    #[arg(long, default_value = "0", help = "Process only the first N POIs")]
    pub sample: usize,

    #[arg(long = "poi-timeout", default_value = "45", help = "Time budget per POI (seconds)")]
    pub poi_timeout: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    #[arg(long, help = "Load run settings from a TOML file instead")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.out
    }

    fn report_path(&self) -> &str {
        &self.report
    }

    fn radius(&self) -> u32 {
        self.radius
    }

    fn qps(&self) -> f64 {
        self.qps
    }

    fn sample(&self) -> usize {
        self.sample
    }

    fn poi_timeout_secs(&self) -> u64 {
        self.poi_timeout
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn region(&self) -> &str {
        &self.region
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_POI_TIMEOUT_SECS, DEFAULT_QPS, DEFAULT_RADIUS};

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["poi-enrich"]);
        assert_eq!(config.input, "poi_milano.jsonl");
        assert_eq!(config.out, "poi_milano_enriched.jsonl");
        assert_eq!(config.report, "report_quality_v2.json");
        assert_eq!(config.radius, DEFAULT_RADIUS);
        assert_eq!(config.qps, DEFAULT_QPS);
        assert_eq!(config.sample, 0);
        assert_eq!(config.poi_timeout, DEFAULT_POI_TIMEOUT_SECS);
        assert!(config.config.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::parse_from([
            "poi-enrich",
            "--input",
            "data/in.jsonl",
            "--radius",
            "300",
            "--qps",
            "1.5",
            "--sample",
            "10",
            "--poi-timeout",
            "5",
            "--verbose",
        ]);
        assert_eq!(config.input_path(), "data/in.jsonl");
        assert_eq!(config.radius(), 300);
        assert_eq!(config.qps(), 1.5);
        assert_eq!(config.sample(), 10);
        assert_eq!(config.poi_timeout_secs(), 5);
        assert!(config.verbose);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = CliConfig::parse_from(["poi-enrich", "--radius", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["poi-enrich", "--qps=-1"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["poi-enrich", "--out", ""]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_qps_and_timeout_accepted() {
        let config = CliConfig::parse_from(["poi-enrich", "--qps", "0", "--poi-timeout", "0"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.qps(), 0.0);
        assert_eq!(config.poi_timeout_secs(), 0);
    }
}

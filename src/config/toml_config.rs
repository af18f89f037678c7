use crate::adapters::places::DEFAULT_BASE_URL;
use crate::config::{
    validate_provider, DEFAULT_INPUT, DEFAULT_LANGUAGE, DEFAULT_OUTPUT, DEFAULT_POI_TIMEOUT_SECS,
    DEFAULT_QPS, DEFAULT_RADIUS, DEFAULT_REGION, DEFAULT_REPORT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub places: PlacesSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSection {
    pub input: Option<String>,
    pub output: Option<String>,
    pub report: Option<String>,
    pub sample: Option<usize>,
    pub poi_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacesSection {
    pub base_url: Option<String>,
    pub radius: Option<u32>,
    pub qps: Option<f64>,
    pub language: Option<String>,
    pub region: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrichError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.run.input.as_deref().unwrap_or(DEFAULT_INPUT)
    }

    fn output_path(&self) -> &str {
        self.run.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }

    fn report_path(&self) -> &str {
        self.run.report.as_deref().unwrap_or(DEFAULT_REPORT)
    }

    fn radius(&self) -> u32 {
        self.places.radius.unwrap_or(DEFAULT_RADIUS)
    }

    fn qps(&self) -> f64 {
        self.places.qps.unwrap_or(DEFAULT_QPS)
    }

    fn sample(&self) -> usize {
        self.run.sample.unwrap_or(0)
    }

    fn poi_timeout_secs(&self) -> u64 {
        self.run.poi_timeout_secs.unwrap_or(DEFAULT_POI_TIMEOUT_SECS)
    }

    fn base_url(&self) -> &str {
        self.places.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn language(&self) -> &str {
        self.places.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    fn region(&self) -> &str {
        self.places.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

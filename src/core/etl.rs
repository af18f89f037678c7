use crate::core::matcher::Matcher;
use crate::core::progress::Progress;
use crate::core::report::{CoverageStats, QualityReport};
use crate::domain::model::{resume_key, EnrichedRecord, PoiRecord};
use crate::domain::ports::{ConfigProvider, PlacesApi, Storage};
use crate::utils::error::{EnrichError, Result};
use crate::utils::monitor::SystemMonitor;
use std::collections::HashSet;
use std::time::Duration;

/// 解析 JSONL 輸入；空白行略過，`limit` 為 0 時讀取全部
pub fn parse_pois(content: &str, limit: usize) -> Result<Vec<PoiRecord>> {
    let mut pois = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if limit > 0 && pois.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let poi: PoiRecord =
            serde_json::from_str(line).map_err(|e| EnrichError::InputError {
                line: idx + 1,
                message: e.to_string(),
            })?;
        pois.push(poi);
    }
    Ok(pois)
}

/// 從既有輸出收集已完成的 `poi_id`，無法解析的行與沒有 id 的行直接忽略
pub fn completed_ids(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter_map(|value| value.get("poi_id").and_then(resume_key))
        .collect()
}

pub fn now_iso_utc() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub struct EnrichEngine<A: PlacesApi, S: Storage, C: ConfigProvider> {
    matcher: Matcher<A>,
    storage: S,
    config: C,
    monitor: SystemMonitor,
}

impl<A: PlacesApi, S: Storage, C: ConfigProvider> EnrichEngine<A, S, C> {
    pub fn new(api: A, storage: S, config: C) -> Self {
        Self::new_with_monitoring(api, storage, config, false)
    }

    pub fn new_with_monitoring(api: A, storage: S, config: C, monitor_enabled: bool) -> Self {
        let matcher = Matcher::new(
            api,
            config.radius(),
            config.qps(),
            Duration::from_secs(config.poi_timeout_secs()),
        );

        Self {
            matcher,
            storage,
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&mut self) -> Result<QualityReport> {
        self.monitor.log_stats("Start");

        // 讀取輸入
        let input = self
            .storage
            .read_to_string(self.config.input_path())
            .await?
            .ok_or_else(|| {
                EnrichError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Input file not found: {}", self.config.input_path()),
                ))
            })?;
        let pois = parse_pois(&input, self.config.sample())?;
        let total = pois.len();

        // 續跑：略過輸出檔中已存在的 POI
        let already = match self.storage.read_to_string(self.config.output_path()).await? {
            Some(content) => completed_ids(&content),
            None => HashSet::new(),
        };

        tracing::info!(
            "🚀 Enriching {} POIs from {} ({} already in {})",
            total,
            self.config.input_path(),
            already.len(),
            self.config.output_path()
        );

        let mut stats = CoverageStats::new();
        let mut progress = Progress::new(total);

        for poi in pois {
            if poi.resume_key().is_some_and(|key| already.contains(&key)) {
                progress.skip();
                continue;
            }

            let category = poi.category.clone();
            let outcome = self.matcher.match_poi(&poi).await;
            stats.record(&category, &outcome);

            tracing::debug!(
                "POI {} -> score {:.2}, confidence {}, rating {:?}",
                poi.id_key(),
                outcome.score,
                outcome.confidence,
                outcome.enrichment.rating
            );

            let record = EnrichedRecord::new(poi, &outcome, now_iso_utc());
            let line = serde_json::to_string(&record)?;
            self.storage
                .append_line(self.config.output_path(), &line)
                .await?;

            if let Some(line) = progress.advance() {
                self.report_progress(&line);
            }
        }

        if let Some(line) = progress.finish() {
            self.report_progress(&line);
        }

        let (nearby, text, details) = self.matcher.cache_sizes();
        tracing::debug!(
            "Cache sizes: nearby={}, text={}, details={}",
            nearby,
            text,
            details
        );

        let report = stats.finalize(total);
        let json = serde_json::to_string_pretty(&report)?;
        self.storage
            .write_file(self.config.report_path(), json.as_bytes())
            .await?;

        tracing::info!("📁 Report saved to: {}", self.config.report_path());
        self.monitor.log_final_stats();
        Ok(report)
    }

    fn report_progress(&mut self, line: &str) {
        println!("{}", line);
        tracing::info!("{}", line);
        self.monitor.log_stats("Progress");
    }
}

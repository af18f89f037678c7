use clap::Parser;
use poi_enrich::adapters::places::API_KEY_ENV;
use poi_enrich::domain::ports::ConfigProvider;
use poi_enrich::utils::error::ErrorSeverity;
use poi_enrich::utils::logger;
use poi_enrich::utils::validation::{validate_required_env, Validate};
use poi_enrich::{
    CliConfig, EnrichEngine, GooglePlacesClient, LocalStorage, QualityReport, Result, TomlConfig,
};

async fn run<C: ConfigProvider + Validate>(config: C, monitor: bool) -> Result<QualityReport> {
    // 驗證配置與金鑰，任何處理開始之前
    config.validate()?;
    let api_key = validate_required_env(API_KEY_ENV)?;

    let api = GooglePlacesClient::new(
        config.base_url(),
        api_key,
        config.language(),
        config.region(),
    )?;
    let mut engine = EnrichEngine::new_with_monitoring(api, LocalStorage::new(), config, monitor);
    engine.run().await
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting poi-enrich CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }
    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match cli.config.as_deref() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(config, cli.monitor).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), cli.monitor).await,
    };

    match result {
        Ok(report) => {
            tracing::info!("✅ Enrichment completed successfully!");
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("Done.\nReport: {}", json),
                Err(_) => println!("Done."),
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Enrichment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

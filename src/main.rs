use anyhow::Context;
use clap::Parser;
use subway_lines::utils::error::ErrorSeverity;
use subway_lines::utils::{logger, validation::Validate};
use subway_lines::{
    CliConfig, InMemoryLineRepository, InMemoryStationRepository, LineService, ScenarioConfig,
    ScenarioRunner, SubwayError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting subway scenario runner");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let scenario = match ScenarioConfig::from_file(&config.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("❌ Failed to load scenario '{}': {}", config.scenario, e);
            exit_with(&e);
        }
    };
    if let Err(e) = scenario.validate() {
        exit_with(&e);
    }

    tracing::info!(
        "✅ Scenario loaded: {} stations, {} lines, {} operations",
        scenario.stations.len(),
        scenario.lines.len(),
        scenario.operations.len()
    );

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - scenario is valid, nothing executed");
        return Ok(());
    }

    let service = LineService::new(InMemoryLineRepository::new(), InMemoryStationRepository::new());
    let runner = ScenarioRunner::new(service, scenario);

    let report = match runner.run().await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    let output = if config.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to render scenario report")?;
    println!("{}", output);

    if report.failed > 0 {
        tracing::warn!("{} operation(s) failed", report.failed);
    }

    Ok(())
}

fn exit_with(e: &SubwayError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

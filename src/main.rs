use clap::Parser;
use fwi_predict::utils::error::ErrorSeverity;
use fwi_predict::utils::{logger, validation::Validate};
use fwi_predict::{CliConfig, FwiError, OutputFormat, PredictionEngine, PredictionResponse};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting fwi-predict CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate().and_then(|_| config.load_file_config()) {
        fail(e);
    }

    let engine = match PredictionEngine::from_provider(&config) {
        Ok(engine) => engine,
        Err(e) => fail(e),
    };

    let raw = match config.raw_observation() {
        Ok(raw) => raw,
        Err(e) => fail(e),
    };

    // 逾時為選用；驗證錯誤仍以 422 回應輸出，而非視為程式失敗
    let outcome = match config.timeout_ms {
        Some(ms) => match engine.predict_within(&raw, Duration::from_millis(ms)).await {
            Ok(prediction) => Ok(prediction),
            Err(FwiError::InvalidInput(errors)) => Err(errors),
            Err(e) => fail(e),
        },
        None => engine.predict(&raw).await,
    };

    let response = PredictionResponse::from_outcome(outcome);
    match config.format {
        OutputFormat::Json => println!("{}", response.to_json_pretty()?),
        OutputFormat::Text => print!("{}", response.render_text()),
    }

    if !response.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn fail(e: FwiError) -> ! {
    tracing::error!(
        "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
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

use anyhow::Context;
use clap::Parser;
use fwi_predict::core::ConfigProvider;
use fwi_predict::utils::validation::{validate_file_extension, validate_positive_number, Validate};
use fwi_predict::utils::logger;
use fwi_predict::{BatchRunner, PredictionEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "batch-predict")]
#[command(about = "Score every row of an observation CSV")]
struct Args {
    /// CSV with one observation per row (canonical names or RH/Ws/Rain/... headers)
    #[arg(short, long)]
    input: String,

    /// Where to write results; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of in-flight predictions
    #[arg(long)]
    concurrency: Option<usize>,

    /// Override simulated latency in milliseconds (batch default: no delay)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting batch prediction");
    validate_file_extension("input", &args.input, &["csv"])?;

    // 載入 TOML 配置
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?
        }
        None => TomlConfig::default(),
    };

    // 批次模式預設不模擬延遲，除非設定檔或命令列另有指定
    let delay_ms = args
        .delay_ms
        .or_else(|| config.latency.as_ref().map(|l| l.delay_ms))
        .unwrap_or(0);
    config.latency = Some(fwi_predict::config::toml_config::LatencyConfig { delay_ms });

    config.validate()?;

    let concurrency = args.concurrency.unwrap_or_else(|| config.batch_concurrency());
    validate_positive_number("concurrency", concurrency, 1)?;

    let engine = PredictionEngine::from_provider(&config)?;
    tracing::info!(
        "🔧 Engine '{}': scorer={}, confidence={}, latency={}ms, concurrency={}",
        config.engine_name(),
        engine.scorer_name(),
        engine.confidence_name(),
        config.latency_ms(),
        concurrency
    );

    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("Failed to open input '{}'", args.input))?;
    let rows = BatchRunner::read_rows(file)?;

    let runner = BatchRunner::new(engine, concurrency);
    let results = runner.run(rows).await;

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output '{}'", path))?;
            BatchRunner::write_results(file, &results)?;
            tracing::info!("📁 Results saved to: {}", path);
        }
        None => BatchRunner::write_results(std::io::stdout().lock(), &results)?,
    }

    let summary = BatchRunner::summarize(&results);
    tracing::info!(
        "✅ Batch complete: {} rows, {} predicted, {} rejected, {} failed",
        summary.total,
        summary.predicted,
        summary.rejected,
        summary.failed
    );
    for (level, count) in &summary.by_level {
        tracing::info!("   {}: {}", level, count);
    }

    Ok(())
}

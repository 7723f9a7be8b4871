use anyhow::Result;
use fwi_predict::core::confidence::FixedConfidence;
use fwi_predict::core::latency::FixedDelay;
use fwi_predict::{BatchRunner, PredictionEngine, RiskLevel};
use std::time::Duration;
use tempfile::TempDir;

const DATASET: &str = "\
day,month,year,Temperature,RH,Ws,Rain,FFMC,DMC,ISI,Classes,Region
01,06,2012,29,57,18,0,65.7,3.4,1.3,0,0
02,06,2012,29,61,13,1.3,64.4,4.1,1,0,0
03,06,2012,26,82,22,13.1,47.1,2.5,0.3,0,0
04,06,2012,25,89,13,2.5,28.6,1.3,0,0,0
05,06,2012,33,54,13,0,88.2,9.9,6.4,1,0
06,06,2012,37,36,19,0,93.5,30.6,16.8,1,1
07,06,2012,31,,15,0,86,12,5,1,1
";

/// 模擬真實資料集：多出的欄位會被忽略，空白欄位只影響該列
#[tokio::test(start_paused = true)]
async fn test_batch_over_dataset_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("observations.csv");
    let output_path = temp_dir.path().join("predictions.csv");
    tokio::fs::write(&input_path, DATASET).await?;

    let engine = PredictionEngine::builder()
        .confidence(FixedConfidence::new(0.8)?)
        .latency(FixedDelay(Duration::from_millis(250)))
        .build();
    let runner = BatchRunner::new(engine, 3);

    let rows = BatchRunner::read_rows(std::fs::File::open(&input_path)?)?;
    assert_eq!(rows.len(), 7);

    let results = runner.run(rows).await;
    BatchRunner::write_results(std::fs::File::create(&output_path)?, &results)?;

    let summary = BatchRunner::summarize(&results);
    assert_eq!(summary.total, 7);
    assert_eq!(summary.predicted, 6);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.by_level.get(&RiskLevel::Extreme), Some(&1));

    // Rain 13.1 drives the score to the floor.
    assert_eq!(results[2].outcome.as_ref().unwrap().fwi(), 0.0);

    let written = std::fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[7].starts_with("7,,,,relativeHumidity: Relative Humidity (%) is required"));

    Ok(())
}

use crate::core::engine::PredictionEngine;
use crate::core::validator::ValidationErrors;
use crate::domain::model::{FirePrediction, RawObservation, RiskLevel};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Why a row produced no prediction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RowError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Prediction task failed: {0}")]
    Failed(String),
}

/// Outcome of one CSV data row (1-based, header excluded).
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub row: usize,
    pub outcome: std::result::Result<FirePrediction, RowError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub predicted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub by_level: BTreeMap<RiskLevel, usize>,
}

/// Runs every row of a tabular observation file through the engine.
pub struct BatchRunner {
    engine: PredictionEngine,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(engine: PredictionEngine, concurrency: usize) -> Self {
        Self {
            engine,
            concurrency: concurrency.max(1),
        }
    }

    /// 讀取 CSV，欄位名稱可用正式名稱或資料集縮寫 (RH, Ws, ...)
    pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawObservation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut rows = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let raw: RawObservation = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();
            rows.push(raw);
        }

        tracing::info!("📥 Read {} observation rows", rows.len());
        Ok(rows)
    }

    /// Results come back in input order whatever order the predictions finish in.
    /// Every input row gets exactly one result, including rows whose task panicked.
    pub async fn run(&self, rows: Vec<RawObservation>) -> Vec<BatchRow> {
        let total = rows.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, raw) in rows.into_iter().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Batch semaphore closed: {}", e);
                    break;
                }
            };
            let engine = self.engine.clone();

            tasks.spawn(async move {
                let outcome = engine.predict(&raw).await.map_err(RowError::Invalid);
                drop(permit);
                BatchRow {
                    row: index + 1,
                    outcome,
                }
            });
        }

        let mut slots: Vec<Option<BatchRow>> = vec![None; total];
        let mut failure = String::from("task did not complete");
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(row) => {
                    let index = row.row - 1;
                    slots[index] = Some(row);
                }
                Err(e) => {
                    tracing::error!("Batch prediction task failed: {}", e);
                    failure = e.to_string();
                }
            }
        }

        // A failed join does not say which row it was running; fill the gaps.
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| BatchRow {
                    row: index + 1,
                    outcome: Err(RowError::Failed(failure.clone())),
                })
            })
            .collect()
    }

    pub fn write_results<W: Write>(writer: W, rows: &[BatchRow]) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["row", "fwi", "risk_level", "confidence", "errors"])?;

        for row in rows {
            let record = match &row.outcome {
                Ok(prediction) => [
                    row.row.to_string(),
                    format!("{:.2}", prediction.fwi()),
                    prediction.risk_level().to_string(),
                    format!("{:.4}", prediction.confidence()),
                    String::new(),
                ],
                Err(errors) => [
                    row.row.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    errors.to_string(),
                ],
            };
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn summarize(rows: &[BatchRow]) -> BatchSummary {
        rows.iter().fold(BatchSummary::default(), |mut summary, row| {
            summary.total += 1;
            match &row.outcome {
                Ok(prediction) => {
                    summary.predicted += 1;
                    *summary.by_level.entry(prediction.risk_level()).or_insert(0) += 1;
                }
                Err(RowError::Invalid(_)) => summary.rejected += 1,
                Err(RowError::Failed(_)) => summary.failed += 1,
            }
            summary
        })
    }
}

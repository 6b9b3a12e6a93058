use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("insufficient data: {0}")]
  InsufficientData(&'static str),
  #[error("empty scan batch")]
  EmptyBatch,
  #[error("export failed: {0}")]
  Export(String),
  #[error("serialization failed: {0}")]
  Serialize(#[from] serde_json::Error),
  #[error("csv write failed: {0}")]
  Csv(#[from] csv::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Ingestion cycle already running")]
    CycleInProgress,

    #[error("Store error: {0}")]
    StoreError(String),
}

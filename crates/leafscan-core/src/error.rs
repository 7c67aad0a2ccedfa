use thiserror::Error;

/// Errors surfaced by [`crate::Analyzer`].
///
/// Classification failures are not errors at this level; they come back as
/// a degraded [`crate::PredictionResult`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no image data provided")]
    EmptyImage,

    #[error("ledger error: {0}")]
    Ledger(#[from] leafscan_ledger::LedgerError),

    #[error("record store error: {0}")]
    Records(#[from] leafscan_records::RecordError),
}

pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

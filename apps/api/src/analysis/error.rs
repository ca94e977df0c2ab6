use thiserror::Error;

/// Failures that prevent an analysis from being produced at all.
/// Everything downstream of extraction is total and never returns these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not extract text: {0}")]
    Extraction(String),

    #[error("Input too large: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

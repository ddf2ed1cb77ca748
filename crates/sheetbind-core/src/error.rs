use sheetbind_model::ModelError;
use thiserror::Error;

/// Session-level failures. Per-row problems never surface here.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The first sheet was requested but the workbook has none.
    #[error("workbook contains no sheets")]
    SourceNotFound,
    #[error("invalid binding: {0}")]
    Binding(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ReadError>;

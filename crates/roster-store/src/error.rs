use std::path::PathBuf;

use roster_core::RowId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("roster file not found: {0}")]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("could not replace roster file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("row {0} out of range")]
    RowOutOfRange(RowId),
}

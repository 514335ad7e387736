//! Storage layer: the roster sheet, held in memory and persisted as Parquet.

mod error;
mod sheet;

pub use error::StoreError;
pub use sheet::{DEFAULT_FILE_NAME, RosterSheet};

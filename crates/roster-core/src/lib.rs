//! Schema, validation and record assembly for the ARL company roster.

pub mod consistency;
pub mod console;
pub mod display;
pub mod entry;
pub mod error;
pub mod record;
pub mod schema;
pub mod store;
pub mod validate;
pub mod value;

#[cfg(test)]
mod testing;

pub use console::Console;
pub use entry::{BulkSummary, Capture, UpdateOutcome, add_record, bulk_load, update_record};
pub use error::{
    AssemblerError, ConsistencyError, FieldError, LineError, RecordError, ValidationError,
};
pub use record::{Record, RecordBuilder};
pub use schema::{Field, FieldKind, roster_schema};
pub use store::{RecordStore, RowId};
pub use validate::validate_field;
pub use value::{IdNumber, IdType, Value};

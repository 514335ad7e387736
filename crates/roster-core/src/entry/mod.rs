//! Record assembly for the three entry paths.
//!
//! Interactive add, interactive update and bulk load all resolve the
//! identification number through [`field_value`], so the consistency rule is
//! applied the same way everywhere.

mod add;
mod bulk;
mod update;

pub use add::{Capture, add_record, capture_record};
pub use bulk::{BulkSummary, bulk_load, parse_bulk_line};
pub use update::{REVIEW_ALL, UpdateOutcome, plan_field_update, update_record};

use crate::consistency::resolve_id_number;
use crate::error::FieldError;
use crate::schema::Field;
use crate::validate::validate_field;
use crate::value::{IdType, Value};

/// Cancels an interactive add, a lookup or a full review.
pub const CANCEL_SENTINEL: &str = "end";

/// Ends a bulk load session.
pub const BULK_END_SENTINEL: &str = "end_bulk";

/// Validate one entered field of a new record.
///
/// `id_type` is the identification type already resolved for the same record.
pub fn field_value(field: Field, raw: &str, id_type: Option<IdType>) -> Result<Value, FieldError> {
    match field {
        Field::IdNumber => resolve_id_number(id_type, raw),
        _ => Ok(validate_field(field, raw)?),
    }
}

//! Identification type vs. identification number.
//!
//! `NO NIT` companies always carry `N/A`; `NIT` companies always carry a real
//! number. Every entry path goes through these functions.

use crate::error::{ConsistencyError, FieldError};
use crate::schema::Field;
use crate::validate::validate_field;
use crate::value::{IdType, NOT_APPLICABLE, Value};

/// The number a record gets without asking, if its type decides it.
pub fn implied_id_number(id_type: Option<IdType>) -> Option<Value> {
    match id_type {
        Some(IdType::NoNit) => Some(Value::text(NOT_APPLICABLE)),
        _ => None,
    }
}

/// Check an already format-validated number against the record's type.
///
/// Returns the number to store: `N/A` for `NO NIT`, the number itself for
/// `NIT`. With no known type the number passes through unchanged.
pub fn check_id_number(
    id_type: Option<IdType>,
    number: Value,
) -> Result<Value, ConsistencyError> {
    let placeholder = number.is_empty() || number.is_not_applicable();
    match id_type {
        Some(IdType::Nit) if placeholder => Err(ConsistencyError::NitRequiresNumber),
        Some(IdType::NoNit) if !placeholder => Err(ConsistencyError::NoNitRequiresNotApplicable),
        Some(IdType::NoNit) => Ok(Value::text(NOT_APPLICABLE)),
        _ => Ok(number),
    }
}

/// Resolve the identification number for a record being entered.
///
/// `NO NIT` short-circuits to `N/A` without looking at `raw`; otherwise the
/// input is format-validated and then checked against the type.
pub fn resolve_id_number(id_type: Option<IdType>, raw: &str) -> Result<Value, FieldError> {
    if let Some(implied) = implied_id_number(id_type) {
        return Ok(implied);
    }
    let number = validate_field(Field::IdNumber, raw)?;
    Ok(check_id_number(id_type, number)?)
}

/// Whether a stored number can back a switch of the type to `NIT`.
pub fn supports_nit(stored_number: &Value) -> bool {
    if stored_number.is_empty() || stored_number.is_not_applicable() {
        return false;
    }
    validate_field(Field::IdNumber, &stored_number.to_string()).is_ok()
}

use tracing::info;

use super::{CANCEL_SENTINEL, field_value};
use crate::console::{Console, banner, is_sentinel};
use crate::consistency::{check_id_number, implied_id_number};
use crate::error::{AssemblerError, FieldError, RecordError};
use crate::record::{Record, RecordBuilder};
use crate::schema::Field;
use crate::store::{RecordStore, RowId};
use crate::value::{IdType, Value};

/// Result of walking every field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Complete(Record),
    /// The user typed the cancel sentinel or input ran out.
    Cancelled,
    /// All fields were answered but the kept values do not form a valid record.
    Rejected(RecordError),
}

/// Prompt for every field in schema order.
///
/// With `current` set (update mode) each prompt shows the stored value and a
/// blank answer keeps it. The identification number is never asked for when
/// the identification type is `NO NIT`; it is set to `N/A`.
pub fn capture_record(
    console: &mut impl Console,
    current: Option<&[Value]>,
) -> Result<Capture, AssemblerError> {
    let mut builder = RecordBuilder::new();

    for field in Field::ALL {
        let id_type = builder.id_type();

        if field == Field::IdNumber
            && let Some(implied) = implied_id_number(id_type)
        {
            console.say(&format!(
                "  {}. {}: assigning '{}' (identification type is NO NIT)",
                field.position(),
                field,
                implied
            ));
            builder.set(field, implied);
            continue;
        }

        let kept = current.map(|cells| cells.get(field.index()).cloned().unwrap_or(Value::Empty));
        let mut prompt = format!("  {}. {} ({})", field.position(), field, field.prompt());
        if let Some(v) = &kept {
            prompt.push_str(&format!(" [current: {v}]"));
        }
        prompt.push_str(": ");

        loop {
            let Some(line) = console.read_line(&prompt)? else {
                return Ok(Capture::Cancelled);
            };
            let input = line.trim();
            if is_sentinel(input, CANCEL_SENTINEL) {
                return Ok(Capture::Cancelled);
            }

            let result = match &kept {
                Some(v) if input.is_empty() => keep_value(field, v.clone(), id_type),
                _ => field_value(field, input, id_type),
            };
            match result {
                Ok(value) => {
                    builder.set(field, value);
                    break;
                }
                Err(e) => console.say(&format!("    * {e}. Try again.")),
            }
        }
    }

    Ok(match builder.build() {
        Ok(record) => Capture::Complete(record),
        Err(e) => Capture::Rejected(e),
    })
}

/// A kept identification number still has to agree with the type.
fn keep_value(
    field: Field,
    value: Value,
    id_type: Option<IdType>,
) -> Result<Value, FieldError> {
    match field {
        Field::IdNumber => Ok(check_id_number(id_type, value)?),
        _ => Ok(value),
    }
}

/// Interactively capture a new company and append it.
///
/// Returns the new row, or `None` when the user cancelled.
pub fn add_record<S: RecordStore>(
    store: &mut S,
    console: &mut impl Console,
) -> Result<Option<RowId>, AssemblerError> {
    banner(console, "--- NEW COMPANY ---", '~');
    console.say(&format!("(type '{CANCEL_SENTINEL}' at any prompt to cancel)"));

    match capture_record(console, None)? {
        Capture::Complete(record) => {
            let row = store.append(&record).map_err(AssemblerError::store)?;
            info!(row, company = %record.company_name, "company added");
            console.say(&format!("Company '{}' added.", record.company_name));
            Ok(Some(row))
        }
        Capture::Cancelled => {
            console.say("Add cancelled.");
            Ok(None)
        }
        Capture::Rejected(e) => {
            console.say(&format!("Company not added: {e}"));
            Ok(None)
        }
    }
}

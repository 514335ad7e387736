use tracing::{info, warn};

use super::{CANCEL_SENTINEL, Capture, capture_record};
use crate::console::{Console, banner, is_sentinel};
use crate::consistency::{check_id_number, supports_nit};
use crate::display::{card_lines, field_menu_lines};
use crate::error::{AssemblerError, ConsistencyError, FieldError, ValidationError};
use crate::schema::Field;
use crate::store::{RecordStore, RowId};
use crate::validate::validate_field;
use crate::value::{IdType, NOT_APPLICABLE, Value};

/// Field-menu choice that walks every field of the record.
pub const REVIEW_ALL: &str = "*";

/// How an update session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Cancelled,
    NotFound(String),
    /// The session on `row` finished; `changed` cells were written.
    Finished { row: RowId, changed: usize },
}

/// Cells to write for a single-field update of a stored row.
///
/// The identification pair is checked against the row's current cells:
/// switching the type to `NO NIT` also writes `N/A` into the number, and
/// switching it to `NIT` is refused while the stored number is a placeholder.
pub fn plan_field_update(
    current: &[Value],
    field: Field,
    input: &str,
) -> Result<Vec<(Field, Value)>, FieldError> {
    let stored = |f: Field| current.get(f.index()).cloned().unwrap_or(Value::Empty);

    match field {
        Field::IdType => {
            let value = validate_field(Field::IdType, input)?;
            match IdType::from_value(&value) {
                Some(IdType::NoNit) => Ok(vec![
                    (Field::IdNumber, Value::text(NOT_APPLICABLE)),
                    (Field::IdType, value),
                ]),
                Some(IdType::Nit) if supports_nit(&stored(Field::IdNumber)) => {
                    Ok(vec![(Field::IdType, value)])
                }
                Some(IdType::Nit) => Err(ConsistencyError::NitWithoutStoredNumber.into()),
                None => Err(ValidationError::IdType.into()),
            }
        }
        Field::IdNumber => {
            let id_type = IdType::from_value(&stored(Field::IdType));
            let number = validate_field(Field::IdNumber, input)?;
            Ok(vec![(Field::IdNumber, check_id_number(id_type, number)?)])
        }
        _ => Ok(vec![(field, validate_field(field, input)?)]),
    }
}

/// Locate a company by name and edit it field by field until the user picks `0`.
///
/// Every accepted change is written to the store immediately; a rejected one
/// leaves the row untouched.
pub fn update_record<S: RecordStore>(
    store: &mut S,
    console: &mut impl Console,
) -> Result<UpdateOutcome, AssemblerError> {
    banner(console, "--- UPDATE EXISTING COMPANY ---", '=');

    let prompt = format!("Company name (RAZON_SOCIAL) to update, or '{CANCEL_SENTINEL}' to cancel: ");
    let name = console.read_line(&prompt)?.unwrap_or_default();
    let name = name.trim();
    if name.is_empty() || is_sentinel(name, CANCEL_SENTINEL) {
        console.say("Update cancelled.");
        return Ok(UpdateOutcome::Cancelled);
    }

    let Some(row) = store.find_by_company_name(name) else {
        console.say(&format!("No company found with name '{name}'."));
        return Ok(UpdateOutcome::NotFound(name.to_string()));
    };
    let mut snapshot = store.row(row).unwrap_or_default();
    snapshot.resize(Field::COUNT, Value::Empty);

    console.say(&format!("Company found at row {}:", row + 1));
    for line in card_lines(&snapshot) {
        console.say(&line);
    }

    let mut changed = 0;
    loop {
        console.say("");
        console.say(&format!(
            "Select the field to update ('0' to finish, '{REVIEW_ALL}' to review every field):"
        ));
        for line in field_menu_lines() {
            console.say(&line);
        }

        let Some(choice) = console.read_line("Field number: ")? else {
            break;
        };
        let choice = choice.trim();
        if choice == "0" {
            break;
        }
        if choice == REVIEW_ALL {
            changed += review_all(store, console, row, &mut snapshot)?;
            continue;
        }

        let Some(field) = choice.parse::<usize>().ok().and_then(Field::from_position) else {
            console.say(&format!(
                "Invalid option. Enter a number from 1 to {} or '0'.",
                Field::COUNT
            ));
            continue;
        };

        console.say(&format!(
            "-> Updating '{field}' [current: {}]",
            snapshot[field.index()]
        ));
        let Some(input) = console.read_line(&format!("  New value for '{field}': "))? else {
            break;
        };

        match plan_field_update(&snapshot, field, input.trim()) {
            Ok(writes) => {
                if field == Field::IdType && writes.len() > 1 {
                    console.say("Identification type is NO NIT: the identification number is set to 'N/A'.");
                }
                changed += write_cells(store, row, &mut snapshot, writes)?;
                console.say(&format!("    '{field}' updated."));
            }
            Err(e) => {
                warn!(row, %field, error = %e, "update rejected");
                console.say(&format!("    * Could not update '{field}': {e}"));
            }
        }
    }

    let company = snapshot[Field::CompanyName.index()].to_string();
    console.say(&format!("Finished updating '{company}' at row {}.", row + 1));
    Ok(UpdateOutcome::Finished { row, changed })
}

/// Walk every field with its current value; write the differences if the
/// result is a valid record.
fn review_all<S: RecordStore>(
    store: &mut S,
    console: &mut impl Console,
    row: RowId,
    snapshot: &mut [Value],
) -> Result<usize, AssemblerError> {
    console.say(&format!(
        "Reviewing every field. Leave blank to keep the current value, '{CANCEL_SENTINEL}' to abandon."
    ));
    match capture_record(console, Some(&*snapshot))? {
        Capture::Complete(record) => {
            let writes: Vec<(Field, Value)> = Field::ALL
                .iter()
                .map(|&f| (f, record.value(f)))
                .filter(|(f, v)| snapshot[f.index()] != *v)
                .collect();
            let changed = write_cells(store, row, snapshot, writes)?;
            console.say(&format!("{changed} field(s) updated."));
            Ok(changed)
        }
        Capture::Cancelled => {
            console.say("Review abandoned; nothing changed.");
            Ok(0)
        }
        Capture::Rejected(e) => {
            console.say(&format!("Review not applied: {e}"));
            Ok(0)
        }
    }
}

fn write_cells<S: RecordStore>(
    store: &mut S,
    row: RowId,
    snapshot: &mut [Value],
    writes: Vec<(Field, Value)>,
) -> Result<usize, AssemblerError> {
    let count = writes.len();
    for (field, value) in writes {
        store
            .set_cell(row, field, value.clone())
            .map_err(AssemblerError::store)?;
        info!(row, %field, value = %value, "cell updated");
        snapshot[field.index()] = value;
    }
    Ok(count)
}

use tracing::{info, warn};

use super::{BULK_END_SENTINEL, field_value};
use crate::console::{Console, banner, is_sentinel};
use crate::error::{AssemblerError, LineError};
use crate::record::{Record, RecordBuilder};
use crate::schema::{Field, headers};
use crate::store::RecordStore;
use crate::validate::validate_field;
use crate::value::IdType;

/// Field delimiter of a bulk line.
pub const DELIMITER: char = '|';

/// Counts reported at the end of a bulk session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub added: usize,
    pub errors: usize,
}

/// Parse one pipe-delimited line into a record, all or nothing.
///
/// The identification type is resolved first so that the identification
/// number can be checked against it; the first failing field rejects the line.
pub fn parse_bulk_line(line: &str) -> Result<Record, LineError> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() != Field::COUNT {
        return Err(LineError::FieldCount {
            found: parts.len(),
            expected: Field::COUNT,
        });
    }
    let part = |field: Field| parts[field.index()].trim();

    let id_type_value =
        validate_field(Field::IdType, part(Field::IdType)).map_err(|e| LineError::Field {
            field: Field::IdType,
            source: e.into(),
        })?;
    let id_type = IdType::from_value(&id_type_value);

    let mut builder = RecordBuilder::new();
    for field in Field::ALL {
        let value = match field {
            Field::IdType => id_type_value.clone(),
            _ => field_value(field, part(field), id_type)
                .map_err(|source| LineError::Field { field, source })?,
        };
        builder.set(field, value);
    }
    Ok(builder.build()?)
}

/// Read pipe-delimited lines until the end sentinel, appending each valid one.
///
/// Lines are independent: a rejected line is reported and counted, and never
/// affects the lines around it.
pub fn bulk_load<S: RecordStore>(
    store: &mut S,
    console: &mut impl Console,
) -> Result<BulkSummary, AssemblerError> {
    banner(console, "--- BULK LOAD ---", '=');
    console.say("Paste one company per line, fields separated by '|' in this order:");
    console.say(&headers().join(" | "));
    console.say(&format!(
        "Type '{}' on its own line when done.",
        BULK_END_SENTINEL.to_uppercase()
    ));
    console.say("");

    let mut summary = BulkSummary::default();
    let prompt = format!("Company line or '{}': ", BULK_END_SENTINEL.to_uppercase());
    while let Some(line) = console.read_line(&prompt)? {
        let line = line.trim();
        if is_sentinel(line, BULK_END_SENTINEL) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match parse_bulk_line(line) {
            Ok(record) => match store.append(&record) {
                Ok(row) => {
                    info!(row, company = %record.company_name, "bulk line added");
                    summary.added += 1;
                }
                Err(e) => {
                    warn!(error = %e, "bulk line could not be stored");
                    console.say(&format!("ERROR: could not store line '{line}': {e}"));
                    summary.errors += 1;
                }
            },
            Err(e) => {
                warn!(error = %e, "bulk line rejected");
                console.say(&format!("ERROR: line '{line}' -> {e}"));
                summary.errors += 1;
            }
        }
    }

    banner(console, "--- BULK LOAD SUMMARY ---", '=');
    console.say(&format!("Companies added: {}", summary.added));
    console.say(&format!("Errors: {}", summary.errors));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConsistencyError, FieldError, ValidationError};
    use crate::testing::{MemoryStore, ScriptedConsole, assert_id_invariant, nit_line};
    use crate::value::{IdNumber, Value};

    fn replace_part(line: &str, field: Field, value: &str) -> String {
        let mut parts: Vec<&str> = line.split('|').collect();
        parts[field.index()] = value;
        parts.join("|")
    }

    #[test]
    fn parses_well_formed_line() {
        let record = parse_bulk_line(&nit_line("Acme SAS")).unwrap();
        assert_eq!(record.company_name, "Acme SAS");
        assert_eq!(record.id_number, IdNumber::Number("900123456-7".into()));
        assert_eq!(record.website, None);
    }

    #[test]
    fn parts_are_trimmed() {
        let line = nit_line("Acme SAS").replace('|', " | ");
        let record = parse_bulk_line(&line).unwrap();
        assert_eq!(record.company_name, "Acme SAS");
        assert_eq!(record.activity_code, 62090);
    }

    #[test]
    fn wrong_part_count_rejected() {
        let line = nit_line("Acme SAS");
        let short = line.rsplit_once('|').unwrap().0;
        assert_eq!(
            parse_bulk_line(short),
            Err(LineError::FieldCount {
                found: 14,
                expected: 15
            })
        );
        let long = format!("{line}|extra");
        assert!(matches!(
            parse_bulk_line(&long),
            Err(LineError::FieldCount { found: 16, .. })
        ));
    }

    #[test]
    fn bad_id_type_rejects_line() {
        let line = replace_part(&nit_line("Acme SAS"), Field::IdType, "CC");
        assert_eq!(
            parse_bulk_line(&line),
            Err(LineError::Field {
                field: Field::IdType,
                source: FieldError::Validation(ValidationError::IdType),
            })
        );
    }

    #[test]
    fn no_nit_ignores_number_part() {
        let line = replace_part(&nit_line("Tienda Luz"), Field::IdType, "no nit");
        let record = parse_bulk_line(&line).unwrap();
        assert_eq!(record.id_number, IdNumber::NotApplicable);
        assert_eq!(record.value(Field::IdType), Value::text("NO NIT"));
    }

    #[test]
    fn nit_with_placeholder_number_rejected() {
        for number in ["", "N/A", "n/a"] {
            let line = replace_part(&nit_line("Acme SAS"), Field::IdNumber, number);
            assert_eq!(
                parse_bulk_line(&line),
                Err(LineError::Field {
                    field: Field::IdNumber,
                    source: FieldError::Consistency(ConsistencyError::NitRequiresNumber),
                }),
                "{number:?}"
            );
        }
    }

    #[test]
    fn first_field_error_is_reported() {
        let line = replace_part(&nit_line("Acme SAS"), Field::RegistrationDate, "2025-01-01");
        let line = replace_part(&line, Field::Phone, "123");
        assert!(matches!(
            parse_bulk_line(&line),
            Err(LineError::Field {
                field: Field::RegistrationDate,
                ..
            })
        ));
    }

    #[test]
    fn short_line_counts_as_error_without_row() {
        let short = nit_line("Acme SAS").rsplit_once('|').unwrap().0.to_string();
        let mut store = MemoryStore::default();
        let mut console = ScriptedConsole::new([short.as_str(), "end_bulk"]);

        let summary = bulk_load(&mut store, &mut console).unwrap();

        assert_eq!(summary, BulkSummary { added: 0, errors: 1 });
        assert!(store.rows.is_empty());
        assert!(console.said("wrong number of fields: 14 vs 15 expected"));
    }

    #[test]
    fn bad_line_does_not_affect_next_line() {
        let bad = replace_part(&nit_line("Globex"), Field::RegistrationDate, "31/31/2025");
        let good = nit_line("Acme SAS");
        let mut store = MemoryStore::default();
        let mut console = ScriptedConsole::new([bad.as_str(), good.as_str(), "END_BULK"]);

        let summary = bulk_load(&mut store, &mut console).unwrap();

        assert_eq!(summary, BulkSummary { added: 1, errors: 1 });
        assert_eq!(store.rows.len(), 1);
        assert_eq!(store.rows[0][Field::CompanyName.index()], Value::text("Acme SAS"));
        let error_at = console
            .output
            .iter()
            .position(|l| l.starts_with("ERROR: line"))
            .unwrap();
        assert!(console.output[error_at].contains("FECHA_DE_MATRICULA"));
        assert!(console.said("Companies added: 1"));
        assert!(console.said("Errors: 1"));
    }

    #[test]
    fn blank_lines_skipped_and_invariant_holds() {
        let no_nit = replace_part(&nit_line("Tienda Luz"), Field::IdType, "NO NIT");
        let mut store = MemoryStore::default();
        let mut console = ScriptedConsole::new([
            "",
            nit_line("Acme SAS").as_str(),
            "   ",
            no_nit.as_str(),
            "end_bulk",
            "never read",
        ]);

        let summary = bulk_load(&mut store, &mut console).unwrap();

        assert_eq!(summary, BulkSummary { added: 2, errors: 0 });
        assert_eq!(console.remaining(), 1);
        assert_id_invariant(&store);
    }

    #[test]
    fn exhausted_input_ends_session() {
        let mut store = MemoryStore::default();
        let mut console = ScriptedConsole::new([nit_line("Acme SAS")]);
        let summary = bulk_load(&mut store, &mut console).unwrap();
        assert_eq!(summary, BulkSummary { added: 1, errors: 0 });
    }
}

//! The company record and its builder.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::consistency::check_id_number;
use crate::error::RecordError;
use crate::schema::Field;
use crate::validate::validate_field;
use crate::value::{IdNumber, IdType, Value};

/// A complete, consistent roster entry.
///
/// Only [`RecordBuilder::build`] creates one, so every `Record` satisfies the
/// identification invariant: `NO NIT` pairs with `N/A`, `NIT` with a number of
/// a valid shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub organization_type: String,
    pub registration_date: NaiveDate,
    pub company_name: String,
    pub id_type: IdType,
    pub id_number: IdNumber,
    pub activity_code: i64,
    pub income: Decimal,
    pub department: String,
    pub municipality: String,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub legal_representative: String,
    pub risk_type: String,
}

impl Record {
    /// Cell value of one field.
    pub fn value(&self, field: Field) -> Value {
        match field {
            Field::OrganizationType => Value::text(&self.organization_type),
            Field::RegistrationDate => Value::Date(self.registration_date),
            Field::CompanyName => Value::text(&self.company_name),
            Field::IdType => self.id_type.into(),
            Field::IdNumber => self.id_number.clone().into(),
            Field::ActivityCode => Value::Integer(self.activity_code),
            Field::Income => Value::Decimal(self.income),
            Field::Department => Value::text(&self.department),
            Field::Municipality => Value::text(&self.municipality),
            Field::Address => Value::text(&self.address),
            Field::Email => optional(&self.email),
            Field::Phone => optional(&self.phone),
            Field::Website => optional(&self.website),
            Field::LegalRepresentative => Value::text(&self.legal_representative),
            Field::RiskType => Value::text(&self.risk_type),
        }
    }

    /// Cells in schema order.
    pub fn to_row(&self) -> Vec<Value> {
        Field::ALL.iter().map(|&f| self.value(f)).collect()
    }

    /// Rebuild a record from schema-ordered cells.
    pub fn from_row(cells: &[Value]) -> Result<Record, RecordError> {
        let mut builder = RecordBuilder::new();
        for (field, cell) in Field::ALL.iter().zip(cells) {
            builder.set(*field, cell.clone());
        }
        builder.build()
    }
}

fn optional(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::text(s),
        None => Value::Empty,
    }
}

/// Collects validated cells one field at a time.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    cells: [Option<Value>; Field::COUNT],
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: Value) -> &mut Self {
        self.cells[field.index()] = Some(value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.cells[field.index()].as_ref()
    }

    /// Identification type captured so far, if it is a canonical one.
    pub fn id_type(&self) -> Option<IdType> {
        self.get(Field::IdType).and_then(IdType::from_value)
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Check that every field is present and the identification pair agrees.
    pub fn build(mut self) -> Result<Record, RecordError> {
        let id_type = match self.take(Field::IdType)? {
            Value::Text(s) => s
                .parse::<IdType>()
                .map_err(|_| RecordError::WrongKind(Field::IdType))?,
            Value::Empty => return Err(RecordError::Missing(Field::IdType)),
            _ => return Err(RecordError::WrongKind(Field::IdType)),
        };
        let id_number = match check_id_number(Some(id_type), self.take(Field::IdNumber)?)? {
            Value::Text(_) if id_type == IdType::NoNit => IdNumber::NotApplicable,
            Value::Text(s) => {
                validate_field(Field::IdNumber, &s).map_err(|source| RecordError::Invalid {
                    field: Field::IdNumber,
                    source,
                })?;
                IdNumber::Number(s)
            }
            _ => return Err(RecordError::WrongKind(Field::IdNumber)),
        };

        Ok(Record {
            organization_type: self.required_text(Field::OrganizationType)?,
            registration_date: match self.take(Field::RegistrationDate)? {
                Value::Date(d) => d,
                Value::Empty => return Err(RecordError::Missing(Field::RegistrationDate)),
                _ => return Err(RecordError::WrongKind(Field::RegistrationDate)),
            },
            company_name: self.required_text(Field::CompanyName)?,
            id_type,
            id_number,
            activity_code: match self.take(Field::ActivityCode)? {
                Value::Integer(i) => i,
                Value::Empty => return Err(RecordError::Missing(Field::ActivityCode)),
                _ => return Err(RecordError::WrongKind(Field::ActivityCode)),
            },
            income: match self.take(Field::Income)? {
                Value::Decimal(d) => d,
                Value::Integer(i) => Decimal::from(i),
                Value::Empty => return Err(RecordError::Missing(Field::Income)),
                _ => return Err(RecordError::WrongKind(Field::Income)),
            },
            department: self.required_text(Field::Department)?,
            municipality: self.required_text(Field::Municipality)?,
            address: self.required_text(Field::Address)?,
            email: self.optional_text(Field::Email)?,
            phone: self.optional_text(Field::Phone)?,
            website: self.optional_text(Field::Website)?,
            legal_representative: self.required_text(Field::LegalRepresentative)?,
            risk_type: self.required_text(Field::RiskType)?,
        })
    }

    fn take(&mut self, field: Field) -> Result<Value, RecordError> {
        self.cells[field.index()]
            .take()
            .ok_or(RecordError::Missing(field))
    }

    fn required_text(&mut self, field: Field) -> Result<String, RecordError> {
        match self.take(field)? {
            Value::Text(s) if !s.is_empty() => Ok(s),
            Value::Text(_) | Value::Empty => Err(RecordError::Missing(field)),
            _ => Err(RecordError::WrongKind(field)),
        }
    }

    fn optional_text(&mut self, field: Field) -> Result<Option<String>, RecordError> {
        match self.take(field)? {
            Value::Text(s) if !s.is_empty() => Ok(Some(s)),
            Value::Text(_) | Value::Empty => Ok(None),
            _ => Err(RecordError::WrongKind(field)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ConsistencyError;

    /// A complete NIT company, as validated cells.
    pub(crate) fn sample_builder() -> RecordBuilder {
        let mut b = RecordBuilder::new();
        b.set(Field::OrganizationType, Value::text("Persona Juridica"))
            .set(
                Field::RegistrationDate,
                Value::Date(NaiveDate::from_ymd_opt(2025, 6, 24).unwrap()),
            )
            .set(Field::CompanyName, Value::text("Acme SAS"))
            .set(Field::IdType, Value::text("NIT"))
            .set(Field::IdNumber, Value::text("900123456-7"))
            .set(Field::ActivityCode, Value::Integer(62090))
            .set(Field::Income, Value::Decimal(Decimal::new(125_000_000, 0)))
            .set(Field::Department, Value::text("Bolivar"))
            .set(Field::Municipality, Value::text("Cartagena"))
            .set(Field::Address, Value::text("Calle 1 # 2-3"))
            .set(Field::Email, Value::text("info@acme.co"))
            .set(Field::Phone, Value::Empty)
            .set(Field::Website, Value::Empty)
            .set(Field::LegalRepresentative, Value::text("Ana Perez"))
            .set(Field::RiskType, Value::text("Riesgo I"));
        b
    }

    #[test]
    fn builds_complete_record() {
        let record = sample_builder().build().unwrap();
        assert_eq!(record.company_name, "Acme SAS");
        assert_eq!(record.id_type, IdType::Nit);
        assert_eq!(record.id_number, IdNumber::Number("900123456-7".into()));
        assert_eq!(record.activity_code, 62090);
        assert_eq!(record.email.as_deref(), Some("info@acme.co"));
        assert_eq!(record.phone, None);
    }

    #[test]
    fn row_round_trip_preserves_cells() {
        let record = sample_builder().build().unwrap();
        let row = record.to_row();
        assert_eq!(row.len(), Field::COUNT);
        assert_eq!(row[Field::IdType.index()], Value::text("NIT"));
        assert_eq!(Record::from_row(&row).unwrap(), record);
    }

    #[test]
    fn missing_field_blocks_build() {
        let mut b = sample_builder();
        b.cells[Field::RiskType.index()] = None;
        assert!(!b.is_complete());
        assert_eq!(b.build(), Err(RecordError::Missing(Field::RiskType)));
    }

    #[test]
    fn empty_required_text_is_missing() {
        let mut b = sample_builder();
        b.set(Field::Address, Value::text(""));
        assert_eq!(b.build(), Err(RecordError::Missing(Field::Address)));
    }

    #[test]
    fn no_nit_pairs_with_not_applicable() {
        let mut b = sample_builder();
        b.set(Field::IdType, Value::text("NO NIT"))
            .set(Field::IdNumber, Value::Empty);
        let record = b.build().unwrap();
        assert_eq!(record.id_number, IdNumber::NotApplicable);
        assert_eq!(record.value(Field::IdNumber), Value::text("N/A"));
    }

    #[test]
    fn inconsistent_pairs_rejected() {
        let mut b = sample_builder();
        b.set(Field::IdNumber, Value::text("N/A"));
        assert_eq!(
            b.build(),
            Err(RecordError::Inconsistent(ConsistencyError::NitRequiresNumber))
        );

        let mut b = sample_builder();
        b.set(Field::IdType, Value::text("NO NIT"));
        assert_eq!(
            b.build(),
            Err(RecordError::Inconsistent(
                ConsistencyError::NoNitRequiresNotApplicable
            ))
        );
    }

    #[test]
    fn malformed_nit_rejected() {
        let mut b = sample_builder();
        b.set(Field::IdNumber, Value::text("9001-7"));
        assert!(matches!(
            b.build(),
            Err(RecordError::Invalid {
                field: Field::IdNumber,
                ..
            })
        ));
    }
}

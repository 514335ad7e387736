//! The fixed, ordered roster schema.
//!
//! Column order is significant: it is the persisted column order, the prompt
//! order of the interactive add, the numbering of the update menu and the part
//! order of a bulk line.

use std::fmt;

use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use rust_decimal::Decimal;

/// Scale used for the persisted income column.
pub const INCOME_SCALE: i8 = 4;

/// `value` rescaled to [`INCOME_SCALE`], or `None` when that would round it
/// or overflow the decimal mantissa.
pub fn income_at_scale(value: Decimal) -> Option<Decimal> {
    let scale = INCOME_SCALE as u32;
    let mut scaled = value;
    scaled.rescale(scale);
    (scaled.scale() == scale && scaled == value).then_some(scaled)
}

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Decimal,
    Integer,
    Text,
}

/// One column of the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    OrganizationType,
    RegistrationDate,
    CompanyName,
    IdType,
    IdNumber,
    ActivityCode,
    Income,
    Department,
    Municipality,
    Address,
    Email,
    Phone,
    Website,
    LegalRepresentative,
    RiskType,
}

impl Field {
    /// All fields in schema order.
    pub const ALL: [Field; 15] = [
        Field::OrganizationType,
        Field::RegistrationDate,
        Field::CompanyName,
        Field::IdType,
        Field::IdNumber,
        Field::ActivityCode,
        Field::Income,
        Field::Department,
        Field::Municipality,
        Field::Address,
        Field::Email,
        Field::Phone,
        Field::Website,
        Field::LegalRepresentative,
        Field::RiskType,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based column index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based position, as shown in prompts and the update menu.
    pub fn position(self) -> usize {
        self.index() + 1
    }

    /// Field at a one-based menu position.
    pub fn from_position(position: usize) -> Option<Field> {
        position
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Persisted column header, verbatim.
    pub fn header(self) -> &'static str {
        match self {
            Field::OrganizationType => "ORG_JURIDICA",
            Field::RegistrationDate => "FECHA_DE_MATRICULA",
            Field::CompanyName => "RAZON_SOCIAL",
            Field::IdType => "TIPO_DE_IDENTIFICACION",
            Field::IdNumber => "NUMERO_DE_NIT",
            Field::ActivityCode => "CIIU",
            Field::Income => "INGRESOS",
            Field::Department => "DEPARTAMENTO",
            Field::Municipality => "MUNICIPIO",
            Field::Address => "DIRECCION",
            Field::Email => "CORREO",
            Field::Phone => "TELEFONO",
            Field::Website => "PAGINA_WEB",
            Field::LegalRepresentative => "REPRESENTANTE_LEGAL",
            Field::RiskType => "TIPO_DE_RIESGO_ARL",
        }
    }

    /// Human description shown next to the header when prompting.
    pub fn prompt(self) -> &'static str {
        match self {
            Field::OrganizationType => {
                "Organization type (e.g. Persona Natural, Persona Juridica, Est. Ag. Suc)"
            }
            Field::RegistrationDate => "Registration date (DD/MM/YYYY, e.g. 24/06/2025)",
            Field::CompanyName => "Company name",
            Field::IdType => "Identification type (NIT or NO NIT)",
            Field::IdNumber => "Identification number (e.g. 900123456-7, or N/A for NO NIT)",
            Field::ActivityCode => "CIIU economic activity (4 or 5 digits, e.g. 62090)",
            Field::Income => "Income (numbers only, e.g. 125000000)",
            Field::Department => "Department (e.g. Bolivar, Cundinamarca)",
            Field::Municipality => "Municipality (e.g. Cartagena, Bogota)",
            Field::Address => "Full address",
            Field::Email => "Email (optional, e.g. info@empresa.com)",
            Field::Phone => "Phone (optional, digits only, 7 or 10 digits, e.g. 3101234567)",
            Field::Website => "Website (optional, e.g. www.empresa.com)",
            Field::LegalRepresentative => "Legal representative",
            Field::RiskType => "ARL risk type (e.g. Riesgo I, Riesgo V, Sin Riesgo)",
        }
    }

    /// Everything is mandatory except the three contact columns.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::Email | Field::Phone | Field::Website)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::RegistrationDate => FieldKind::Date,
            Field::Income => FieldKind::Decimal,
            Field::ActivityCode => FieldKind::Integer,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Column headers in schema order.
pub fn headers() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.header()).collect()
}

/// Arrow data type for a column kind.
pub fn arrow_type(kind: FieldKind) -> DataType {
    match kind {
        FieldKind::Date => DataType::Date32,
        FieldKind::Decimal => DataType::Decimal128(38, INCOME_SCALE),
        FieldKind::Integer => DataType::Int64,
        FieldKind::Text => DataType::Utf8,
    }
}

/// Arrow schema of the persisted roster.
///
/// Every column is nullable: optional contact fields are stored as nulls, and
/// rows loaded from older files may have gaps.
pub fn roster_schema() -> Schema {
    Schema::new(
        Field::ALL
            .iter()
            .map(|f| ArrowField::new(f.header(), arrow_type(f.kind()), true))
            .collect::<Vec<_>>(),
    )
}

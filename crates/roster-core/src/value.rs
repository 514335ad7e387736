//! Typed cell values.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Display and input format for dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Identification number stored for companies without a NIT.
pub const NOT_APPLICABLE: &str = "N/A";

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Date(NaiveDate),
    Decimal(Decimal),
    Integer(i64),
    Text(String),
    Empty,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// True for `Empty` and for blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the cell holds the `N/A` sentinel, in any case.
    pub fn is_not_applicable(&self) -> bool {
        self.as_text()
            .is_some_and(|s| s.eq_ignore_ascii_case(NOT_APPLICABLE))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Decimal(d) => write!(f, "{}", d.normalize()),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => f.write_str(s),
            Value::Empty => Ok(()),
        }
    }
}

/// Identification type of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Nit,
    NoNit,
}

impl IdType {
    pub fn as_str(self) -> &'static str {
        match self {
            IdType::Nit => "NIT",
            IdType::NoNit => "NO NIT",
        }
    }

    /// Identification type held in a cell, if it is one of the canonical forms.
    pub fn from_value(value: &Value) -> Option<IdType> {
        value.as_text().and_then(|s| s.parse().ok())
    }
}

/// Case-insensitive; anything but `NIT` / `NO NIT` is rejected.
impl FromStr for IdType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NIT" => Ok(IdType::Nit),
            "NO NIT" => Ok(IdType::NoNit),
            _ => Err(()),
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IdType> for Value {
    fn from(t: IdType) -> Self {
        Value::text(t.as_str())
    }
}

/// Identification number of a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdNumber {
    NotApplicable,
    Number(String),
}

impl IdNumber {
    pub fn as_str(&self) -> &str {
        match self {
            IdNumber::NotApplicable => NOT_APPLICABLE,
            IdNumber::Number(n) => n,
        }
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IdNumber> for Value {
    fn from(n: IdNumber) -> Self {
        match n {
            IdNumber::NotApplicable => Value::text(NOT_APPLICABLE),
            IdNumber::Number(s) => Value::Text(s),
        }
    }
}

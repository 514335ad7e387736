//! Per-field validation.
//!
//! Each field maps to one [`Rule`]; [`validate`] applies the shared
//! mandatory/optional policy before handing non-empty input to the rule.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ValidationError;
use crate::schema::{Field, income_at_scale};
use crate::value::{DATE_FORMAT, IdType, NOT_APPLICABLE, Value};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{7}|[0-9]{10})$").unwrap());

/// NIT with check digit: nine digits, a dash, one digit.
static NIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{9}-[0-9]$").unwrap());

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static CIIU_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4,5}$").unwrap());

/// Validation strategy for one field. Receives trimmed input.
pub type Rule = fn(&str) -> Result<Value, ValidationError>;

impl Field {
    pub fn rule(self) -> Rule {
        match self {
            Field::RegistrationDate => date,
            Field::Income => income,
            Field::Email => email,
            Field::Phone => phone,
            Field::IdType => id_type,
            Field::IdNumber => id_number,
            Field::ActivityCode => activity_code,
            Field::OrganizationType
            | Field::CompanyName
            | Field::Department
            | Field::Municipality
            | Field::Address
            | Field::Website
            | Field::LegalRepresentative
            | Field::RiskType => text,
        }
    }

    /// Fields whose empty input is a meaningful value rather than a missing one.
    ///
    /// An empty identification number is left for the consistency rule to judge.
    pub fn accepts_empty(self) -> bool {
        matches!(self, Field::IdNumber)
    }
}

/// Validate raw input for `field`.
///
/// Empty input is a [`ValidationError::Mandatory`] error when `required`, an
/// [`Value::Empty`] success otherwise.
pub fn validate(field: Field, raw: &str, required: bool) -> Result<Value, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() && !field.accepts_empty() {
        return if required {
            debug!(%field, "mandatory field left empty");
            Err(ValidationError::Mandatory(field))
        } else {
            Ok(Value::Empty)
        };
    }
    let result = (field.rule())(raw);
    if let Err(ref e) = result {
        debug!(%field, input = raw, error = %e, "rejected field value");
    }
    result
}

/// Validate using the field's own required flag.
pub fn validate_field(field: Field, raw: &str) -> Result<Value, ValidationError> {
    validate(field, raw, field.is_required())
}

// ── Rules ──

fn text(raw: &str) -> Result<Value, ValidationError> {
    Ok(Value::text(raw))
}

fn date(raw: &str) -> Result<Value, ValidationError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Value::Date)
        .map_err(|_| ValidationError::Date)
}

fn income(raw: &str) -> Result<Value, ValidationError> {
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ValidationError::Income)?;
    income_at_scale(value)
        .map(|_| Value::Decimal(value))
        .ok_or(ValidationError::IncomeRange)
}

fn email(raw: &str) -> Result<Value, ValidationError> {
    if raw.is_empty() {
        return Ok(Value::Empty);
    }
    if EMAIL_RE.is_match(raw) {
        Ok(Value::text(raw))
    } else {
        Err(ValidationError::Email)
    }
}

fn phone(raw: &str) -> Result<Value, ValidationError> {
    if raw.is_empty() {
        return Ok(Value::Empty);
    }
    if PHONE_RE.is_match(raw) {
        Ok(Value::text(raw))
    } else {
        Err(ValidationError::Phone)
    }
}

fn id_type(raw: &str) -> Result<Value, ValidationError> {
    IdType::from_str(raw)
        .map(Value::from)
        .map_err(|_| ValidationError::IdType)
}

fn id_number(raw: &str) -> Result<Value, ValidationError> {
    if raw.is_empty() {
        return Ok(Value::Empty);
    }
    if raw.eq_ignore_ascii_case(NOT_APPLICABLE) {
        return Ok(Value::text(NOT_APPLICABLE));
    }
    if NIT_RE.is_match(raw) || DIGITS_RE.is_match(raw) {
        Ok(Value::text(raw))
    } else {
        Err(ValidationError::IdNumber)
    }
}

fn activity_code(raw: &str) -> Result<Value, ValidationError> {
    if !CIIU_RE.is_match(raw) {
        return Err(ValidationError::ActivityCode);
    }
    raw.parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| ValidationError::ActivityCode)
}

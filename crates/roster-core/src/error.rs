use thiserror::Error;

use crate::schema::Field;

/// A single field value failed its own format rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' is mandatory")]
    Mandatory(Field),

    #[error("incorrect date format, use DD/MM/YYYY")]
    Date,

    #[error("invalid income value, numbers only")]
    Income,

    #[error("income value out of range, at most 4 decimal places")]
    IncomeRange,

    #[error("invalid email format")]
    Email,

    #[error("invalid phone format (digits only, 7 or 10)")]
    Phone,

    #[error("invalid identification type, must be NIT or NO NIT")]
    IdType,

    #[error("invalid NIT format, use XXXXXXXXX-X or digits only")]
    IdNumber,

    #[error("invalid CIIU format, must be 4 or 5 digit number")]
    ActivityCode,
}

/// Identification type and identification number disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("identification type NIT requires non-empty number")]
    NitRequiresNumber,

    #[error("identification type NO NIT requires N/A or empty number")]
    NoNitRequiresNotApplicable,

    #[error("identification type NIT requires a stored number; update the identification number first")]
    NitWithoutStoredNumber,
}

/// Either kind of rejection for a value entered into a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

/// A record could not be assembled from its cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field '{0}' is missing")]
    Missing(Field),

    #[error("field '{0}' holds a value of the wrong kind")]
    WrongKind(Field),

    #[error("field '{field}': {source}")]
    Invalid {
        field: Field,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Inconsistent(#[from] ConsistencyError),
}

/// A bulk line was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("wrong number of fields: {found} vs {expected} expected")]
    FieldCount { found: usize, expected: usize },

    #[error("field '{field}': {source}")]
    Field {
        field: Field,
        #[source]
        source: FieldError,
    },

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// An entry operation could not reach the store or the console.
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}

impl AssemblerError {
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        AssemblerError::Store(Box::new(err))
    }
}

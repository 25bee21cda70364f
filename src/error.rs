//! Error taxonomy for validation and conversion.
//!
//! Every failure names the field and rule that rejected the input. There
//! is no partial recovery anywhere in the crate: an out-of-range metric
//! is reported, never clamped, and a malformed flat field is reported,
//! never skipped.

use std::fmt;

use thiserror::Error;

/// A single field-level rule failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    #[error("field `{field}` is not a valid v4 UUID: `{value}`")]
    InvalidUuid { field: &'static str, value: String },

    #[error("field `{field}` is not an ISO-8601 timestamp with a timezone offset: `{value}`")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("link entry `{0}` does not match `relation:uuid`")]
    InvalidLinkFormat(String),

    #[error("field `{field}` is out of range: {value} (expected {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("start offset {start} exceeds end offset {end}")]
    InvalidOffsetRange { start: u64, end: u64 },

    #[error("field `{field}` has unknown value `{value}`")]
    InvalidEnumValue { field: &'static str, value: String },
}

/// Every rule failure found while building a chunk, in field order.
///
/// The builder reports the full set rather than the first failure, so a
/// caller fixing its input sees all problems at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk validation failed: ")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True when any contained failure matches the predicate.
    pub fn any(&self, pred: impl Fn(&ValidationError) -> bool) -> bool {
        self.0.iter().any(pred)
    }
}

/// Failure to restore a structured chunk from flat input.
///
/// Raised only for structurally malformed flat data: a joined list that
/// does not parse, bad `block_meta` JSON, or a field-level rule failure
/// on a string that should hold a UUID, timestamp, or enum value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("field `{field}` cannot be parsed as {expected}: `{value}`")]
    Malformed {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

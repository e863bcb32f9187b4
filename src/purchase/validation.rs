//! Boundary parsing of raw purchase form fields.

use std::num::IntErrorKind;

use serde::Deserialize;
use thiserror::Error;

/// Error constants for validation failures.
pub mod errmsg {
    pub const MISSING_FIELDS: &str = "missing fields";
    pub const NON_NUMERIC: &str = "non-numeric input";
    pub const QUANTITY_POSITIVE: &str = "quantity must be positive";
    pub const INVALID_AGE: &str = "invalid age";
}

/// Inclusive bounds of an acceptable age.
pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", errmsg::MISSING_FIELDS)]
    MissingFields,
    #[error("{}", errmsg::NON_NUMERIC)]
    NonNumeric,
    #[error("{}", errmsg::QUANTITY_POSITIVE)]
    NonPositiveQuantity,
    #[error("{}", errmsg::INVALID_AGE)]
    InvalidAge,
}

/// Whether the buyer declared themselves a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    Yes,
    No,
}

impl StudentStatus {
    /// `sim` and `yes` (any case) mean student; anything else does not.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized == "sim" || normalized == "yes" {
            StudentStatus::Yes
        } else {
            StudentStatus::No
        }
    }
}

/// Purchase form fields exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PurchaseRequest {
    #[serde(alias = "idade")]
    pub age: Option<String>,
    #[serde(alias = "estudante")]
    pub student: Option<String>,
    #[serde(alias = "quantidade")]
    pub quantity: Option<String>,
}

/// A request that passed every field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub age: i64,
    pub student: StudentStatus,
    pub quantity: u64,
}

impl PurchaseRequest {
    pub fn new(age: &str, student: &str, quantity: &str) -> Self {
        Self {
            age: Some(age.to_string()),
            student: Some(student.to_string()),
            quantity: Some(quantity.to_string()),
        }
    }

    /// Run the field checks in order; the first failure wins.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let (Some(age), Some(student), Some(quantity)) = (
            present(&self.age),
            present(&self.student),
            present(&self.quantity),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        let age = parse_integer(age)?;
        let quantity = parse_integer(quantity)?;

        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(ValidationError::InvalidAge);
        }

        Ok(ValidatedRequest {
            age,
            student: StudentStatus::parse(student),
            quantity: quantity as u64,
        })
    }
}

/// A submitted, non-empty field. Whitespace counts as content.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Parse a whole number, ignoring surrounding whitespace.
///
/// Values beyond `i64` saturate so they fail the range and stock checks
/// rather than reading as non-numeric.
fn parse_integer(raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse::<i64>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(ValidationError::NonNumeric),
    })
}

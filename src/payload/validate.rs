//! Per-id-type format validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::form::IdType;

// National identity numbers are 15 digits starting with 784, written with
// or without the customary dashes (784-YYYY-NNNNNNN-C).
static EMIRATES_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^784-?[0-9]{4}-?[0-9]{7}-?[0-9]$").unwrap());

// Card / member numbers vary wildly between payers; accept alphanumerics
// plus the separators seen in the wild, within sane length bounds.
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/_.-]{2,31}$").unwrap());

// Health-authority member ids are purely numeric.
static DHA_MEMBER_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6,12}$").unwrap());

/// Validates `value` against the format for `id_type`.
///
/// The value is trimmed before matching; the trimmed form is what the
/// payload builder submits.
///
/// # Errors
///
/// [`ValidationError::InvalidIdFormat`] naming the id type and the
/// rejected value.
///
/// # Examples
///
/// ```
/// use eligibility_engine::payload::validate_id;
/// use eligibility_engine::types::IdType;
///
/// assert!(validate_id(IdType::EmiratesId, "784-1990-1234567-1").is_ok());
/// assert!(validate_id(IdType::EmiratesId, "784199012345671").is_ok());
/// assert!(validate_id(IdType::EmiratesId, "123-1990-1234567-1").is_err());
/// ```
pub fn validate_id(id_type: IdType, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field: "id_value" });
    }

    let pattern: &Regex = match id_type {
        IdType::EmiratesId => &EMIRATES_ID,
        IdType::CardNumber => &CARD_NUMBER,
        IdType::DhaMemberId => &DHA_MEMBER_ID,
    };

    if pattern.is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdFormat {
            id_type,
            value: trimmed.to_string(),
        })
    }
}

//! Validation of raw search-form input into a [`CaseKey`].
//!
//! # Rules, checked in order
//!
//! 1. Case type, case number and filing year must all be present and non-blank.
//! 2. Filing year must parse as an integer.
//! 3. Filing year must fall within `[MIN_FILING_YEAR, max_year]`.
//! 4. Case number must be at least 3 characters, and at least 3 of them
//!    alphanumeric.
//!
//! Case type is upper-cased; case number is trimmed but otherwise kept as typed.

use thiserror::Error;

use crate::CaseKey;

/// Earliest filing year accepted by the search form.
pub const MIN_FILING_YEAR: i32 = 1950;

const MIN_CASE_NUMBER_LEN: usize = 3;

/// Raw form fields, exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub case_type: Option<String>,
    pub case_number: Option<String>,
    pub filing_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required. Please fill in Case Type, Case Number, and Filing Year.")]
    MissingFields,

    #[error("Filing year must be a valid number.")]
    InvalidYear,

    #[error("Filing year must be between {min} and {max}.")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Case number must be at least 3 characters long")]
    CaseNumberTooShort,

    #[error("Case number must contain alphanumeric characters")]
    CaseNumberNotAlphanumeric,
}

/// Validate form input, returning the normalised key.
pub fn validate(input: &SearchInput, max_year: i32) -> Result<CaseKey, ValidationError> {
    let case_type = non_blank(input.case_type.as_deref());
    let case_number = non_blank(input.case_number.as_deref());
    let filing_year = non_blank(input.filing_year.as_deref());

    let (Some(case_type), Some(case_number), Some(filing_year)) =
        (case_type, case_number, filing_year)
    else {
        return Err(ValidationError::MissingFields);
    };

    let year: i32 = filing_year
        .parse()
        .map_err(|_| ValidationError::InvalidYear)?;
    if !(MIN_FILING_YEAR..=max_year).contains(&year) {
        return Err(ValidationError::YearOutOfRange {
            year,
            min: MIN_FILING_YEAR,
            max: max_year,
        });
    }

    validate_case_number(case_number)?;

    Ok(CaseKey::new(case_type.to_ascii_uppercase(), case_number, year))
}

/// Check the minimal case-number format rule.
pub fn validate_case_number(case_number: &str) -> Result<(), ValidationError> {
    let trimmed = case_number.trim();
    if trimmed.chars().count() < MIN_CASE_NUMBER_LEN {
        return Err(ValidationError::CaseNumberTooShort);
    }
    let alnum = trimmed.chars().filter(|c| c.is_alphanumeric()).count();
    if alnum == 0 {
        return Err(ValidationError::CaseNumberNotAlphanumeric);
    }
    if alnum < MIN_CASE_NUMBER_LEN {
        return Err(ValidationError::CaseNumberTooShort);
    }
    Ok(())
}

fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

//! Error types for the gala catalog domain.
//!
//! Domain errors describe values that can never form a valid record or query.
//! Storage and lookup failures live in the infrastructure layer.

use crate::gala::{FIRST_GALA_YEAR, LAST_GALA_YEAR};

/// Domain-level validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Unknown zodiac sign
    #[error("Invalid zodiac sign: {0}")]
    InvalidZodiac(String),

    /// Year outside the supported gala range
    #[error("Year {0} is outside 1982..=2050")]
    YearOutOfRange(u32),
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidZodiac(_) => "INVALID_ZODIAC",
            Self::YearOutOfRange(_) => "YEAR_OUT_OF_RANGE",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Check that `year` is a valid gala year.
pub fn ensure_gala_year(year: u32) -> Result<u32, DomainError> {
    if (FIRST_GALA_YEAR..=LAST_GALA_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(DomainError::YearOutOfRange(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::InvalidZodiac("cat".into()).error_code(),
            "INVALID_ZODIAC"
        );
        assert_eq!(DomainError::YearOutOfRange(1900).http_status(), 400);
    }

    #[test]
    fn test_year_message() {
        let err = DomainError::YearOutOfRange(1900);
        assert_eq!(err.to_string(), "Year 1900 is outside 1982..=2050");
    }

    #[test]
    fn test_ensure_gala_year() {
        assert_eq!(ensure_gala_year(1982), Ok(1982));
        assert_eq!(ensure_gala_year(2050), Ok(2050));
        assert!(ensure_gala_year(1981).is_err());
        assert!(ensure_gala_year(2051).is_err());
    }
}

//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidMonthFormat`] returned when a period is not a `YYYY-MM` string.
//! - [`InvalidRange`] returned for empty series windows or out-of-range dates.
//! - [`KeyNotFound`] returned when an item is not found for the caller.
//! - [`ExistingKey`] returned when a budget already exists for a category/month.
//!
//! Integrity problems found while aggregating are *not* errors: they are
//! reported through [`DataIntegrityFault`] next to the computed value.
//!
//!  [`InvalidMonthFormat`]: EngineError::InvalidMonthFormat
//!  [`InvalidRange`]: EngineError::InvalidRange
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`DataIntegrityFault`]: crate::DataIntegrityFault
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid month format: {0}")]
    InvalidMonthFormat(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            EngineError::InvalidMonthFormat("2024-13".to_string()).to_string(),
            "Invalid month format: 2024-13"
        );
        assert_eq!(
            EngineError::ExistingKey("budget Lazer 2024-07".to_string()).to_string(),
            "\"budget Lazer 2024-07\" already present!"
        );
    }
}

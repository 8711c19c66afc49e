//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so the engine enforces consistent invariants.

use crate::{EngineError, Money, ResultEngine};

/// Trim a required text field and reject it when empty.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Reject amounts whose magnitude exceeds [`Money::MAX_ABS`].
pub(crate) fn ensure_within_bounds(value: Money, label: &str) -> ResultEngine<()> {
    if !value.is_within_bounds() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be between -{max} and {max}",
            max = Money::MAX_ABS
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(value: Money, label: &str) -> ResultEngine<()> {
    ensure_within_bounds(value, label)?;
    if value.is_negative() {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

pub(crate) fn ensure_positive(value: Money, label: &str) -> ResultEngine<()> {
    ensure_within_bounds(value, label)?;
    if !value.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

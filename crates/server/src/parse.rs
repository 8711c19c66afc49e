//! Conversions from wire values to engine types.

use chrono::{NaiveDate, Utc};
use tracing::warn;

use engine::{Category, Checked, EngineError, MAX_SERIES_MONTHS, YearMonth};

use crate::ServerError;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses `YYYY-MM`, defaulting to the current month.
pub(crate) fn month_or_current(raw: Option<&str>) -> Result<YearMonth, ServerError> {
    match raw {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(YearMonth::of(today())),
    }
}

pub(crate) fn required_month(raw: Option<&str>) -> Result<YearMonth, ServerError> {
    let raw = raw.ok_or_else(|| ServerError::Generic("month is required".to_string()))?;
    Ok(raw.parse()?)
}

pub(crate) fn category(raw: &str) -> Result<Category, ServerError> {
    Ok(raw.parse()?)
}

pub(crate) fn month_count(raw: i64) -> Result<u32, ServerError> {
    u32::try_from(raw)
        .ok()
        .filter(|count| (1..=MAX_SERIES_MONTHS).contains(count))
        .ok_or_else(|| {
            EngineError::InvalidRange(format!("months must be between 1 and {MAX_SERIES_MONTHS}"))
                .into()
        })
}

/// Logs the integrity fault (if any) and returns the unwrapped value.
pub(crate) fn log_fault<T>(checked: Checked<T>, user: &str, view: &str) -> T {
    if let Some(fault) = &checked.fault {
        warn!(
            user,
            view,
            transaction_ids = ?fault.transaction_ids,
            "{fault}"
        );
    }
    checked.into_value()
}

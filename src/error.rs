//! Error types for range-init and selection.

use crate::data::MonthKey;
use chrono::NaiveDate;

/// Error type for every fallible picker operation.
///
/// All variants are raised synchronously at the offending call and leave
/// existing picker state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickerError {
    /// Construction bounds or locale were rejected.
    #[error("invalid range: {reason}")]
    InvalidRange {
        /// Human readable description of what was wrong.
        reason: String,
    },

    /// A selection target falls outside `[min, max)`.
    #[error("date {date} is outside the selectable range [{min}, {max})")]
    OutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    /// More than two initial dates were supplied.
    #[error("range selection allows at most two dates, got {count}")]
    TooManySelections { count: usize },

    /// A month key was not present in the index. Indicates a broken invariant.
    #[error("month {key} not found in index")]
    NotFound { key: MonthKey },
}

impl PickerError {
    pub(crate) fn invalid_range(reason: impl Into<String>) -> Self {
        PickerError::InvalidRange {
            reason: reason.into(),
        }
    }
}

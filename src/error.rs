// ⚠️ Engine Errors
// Input-validation failures surfaced to the caller. Nothing here is transient.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A raw record is missing a structural field or carries an out-of-range value
    #[error("invalid record #{index}: {field} {reason}")]
    InvalidRecord {
        index: usize,
        field: String,
        reason: String,
    },

    /// A (month, day) pair that cannot be placed on any calendar
    #[error("invalid date: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },

    #[error("invalid filter state: {0}")]
    InvalidFilterState(String),
}

impl CalendarError {
    pub(crate) fn invalid_record(
        index: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalendarError::InvalidRecord {
            index,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;

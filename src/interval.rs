use std::fmt;

use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum IntervalError {
    #[error("invalid date interval: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive calendar-date interval, the user-supplied filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}
impl DateInterval {
    /// Builds the interval, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }
    pub fn start(&self) -> NaiveDate {
        self.start
    }
    pub fn end(&self) -> NaiveDate {
        self.end
    }
    /// True if `date` falls inside the interval, both bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

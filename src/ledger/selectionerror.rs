use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::catalogerror::NotFoundError;

/// Why a date cannot become a vacation day.
///
/// Checked in declaration order; the first matching reason is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejection {
    Weekend,
    NoHolidayData(NotFoundError),
    Holiday { name: String },
    AlreadySelected,
}

impl SelectionRejection {
    pub fn code(&self) -> &'static str {
        match self {
            SelectionRejection::Weekend => "weekend",
            SelectionRejection::NoHolidayData(_) => "no holiday data",
            SelectionRejection::Holiday { .. } => "holiday",
            SelectionRejection::AlreadySelected => "already selected",
        }
    }
}

impl fmt::Display for SelectionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionRejection::NoHolidayData(error) => write!(f, "{} ({})", self.code(), error),
            SelectionRejection::Holiday { name } => write!(f, "{} ({})", self.code(), name),
            _ => f.write_str(self.code()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{date} cannot be selected: {reason}")]
pub struct InvalidSelectionError {
    pub date: NaiveDate,
    pub reason: SelectionRejection,
}

impl InvalidSelectionError {
    pub fn new(date: NaiveDate, reason: SelectionRejection) -> InvalidSelectionError {
        InvalidSelectionError { date, reason }
    }
}

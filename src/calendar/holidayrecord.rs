use chrono::{Datelike, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single public holiday: the date and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HolidayRecord {
    date: NaiveDate,
    name: String,
}

impl HolidayRecord {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> HolidayRecord {
        HolidayRecord {
            date,
            name: name.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Records are ordered by date first so a year's holidays iterate chronologically.
impl PartialOrd for HolidayRecord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HolidayRecord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.name.cmp(&other.name))
    }
}

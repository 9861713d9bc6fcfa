use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::holidayrecord::HolidayRecord;
use crate::time::rangeofdates::RangeOfDates;

pub trait HolidayCalendar {
    fn is_weekend(&self, d: NaiveDate) -> bool;

    fn is_holiday(&self, d: NaiveDate) -> bool;

    fn is_working_day(&self, d: NaiveDate) -> bool {
        !self.is_weekend(d) && !self.is_holiday(d)
    }

    fn working_days_in_range(&self, range: &RangeOfDates) -> usize {
        range.iter().filter(|d| self.is_working_day(*d)).count()
    }
}

/// Weekend days as a bitmask, bit `n` set for `Weekday::num_days_from_monday() == n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendMask(u8);

impl WeekendMask {
    pub fn new(weekends: &[Weekday]) -> Self {
        let mut mask = 0u8;
        for weekday in weekends {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekendMask(mask)
    }

    pub fn saturday_sunday() -> Self {
        WeekendMask::new(&[Weekday::Sat, Weekday::Sun])
    }

    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }
}

impl Default for WeekendMask {
    fn default() -> Self {
        WeekendMask::saturday_sunday()
    }
}

/// Holidays of a single region and year, plus the weekend rule.
#[derive(Debug, Clone)]
pub struct RegionYearCalendar {
    year: i32,
    weekends: WeekendMask,
    holidays: BTreeMap<NaiveDate, String>,
}

impl RegionYearCalendar {
    pub fn new<'a, I>(year: i32, records: I) -> RegionYearCalendar
    where
        I: IntoIterator<Item = &'a HolidayRecord>,
    {
        RegionYearCalendar {
            year,
            weekends: WeekendMask::default(),
            holidays: records
                .into_iter()
                .map(|r| (r.date(), r.name().to_owned()))
                .collect(),
        }
    }

    pub fn holiday_name(&self, d: NaiveDate) -> Option<&str> {
        self.holidays.get(&d).map(|name| name.as_str())
    }

    /// Working days of the whole calendar year.
    pub fn working_days(&self) -> usize {
        match RangeOfDates::year(self.year) {
            Some(range) => self.working_days_in_range(&range),
            None => 0,
        }
    }
}

impl HolidayCalendar for RegionYearCalendar {
    #[inline]
    fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }

    fn is_holiday(&self, d: NaiveDate) -> bool {
        self.holidays.contains_key(&d)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::{HolidayCalendar, RegionYearCalendar, WeekendMask};
    use crate::calendar::holidayrecord::HolidayRecord;
    
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn berlin_2025() -> RegionYearCalendar {
        let records = vec![
            HolidayRecord::new(date(2025, 1, 1), "New Year's Day"),
            HolidayRecord::new(date(2025, 12, 25), "Christmas Day"),
        ];
        RegionYearCalendar::new(2025, records.iter())
    }

    #[test]
    fn weekend_mask_covers_saturday_and_sunday() {
        let mask = WeekendMask::default();
        assert!(mask.is_weekend(Weekday::Sat));
        assert!(mask.is_weekend(Weekday::Sun));
        assert!(!mask.is_weekend(Weekday::Fri));
    }

    #[test]
    fn working_day_excludes_weekends_and_holidays() {
        let calendar = berlin_2025();
        assert!(!calendar.is_working_day(date(2025, 1, 1)));
        assert!(calendar.is_working_day(date(2025, 1, 2)));
        assert!(!calendar.is_working_day(date(2025, 1, 4)));
        assert_eq!(calendar.holiday_name(date(2025, 12, 25)), Some("Christmas Day"));
        assert!(calendar.is_holiday(date(2025, 1, 1)));
        assert_eq!(calendar.holiday_name(date(2025, 1, 2)), None);
    }

    #[test]
    fn working_days_count_for_the_year() {
        // 365 days - 104 weekend days - 2 weekday holidays
        assert_eq!(berlin_2025().working_days(), 259);
    }
}

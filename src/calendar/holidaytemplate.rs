use chrono::NaiveDate;

use crate::calendar::holidayrecord::HolidayRecord;

/// Fixed-date public holidays shared by every German state.
///
/// Easter-dependent holidays differ per year and are not included; add them
/// to the configuration explicitly.
const GERMAN_FIXED_HOLIDAYS: [(u32, u32, &str); 5] = [
    (1, 1, "New Year's Day"),
    (5, 1, "Labour Day"),
    (10, 3, "German Unity Day"),
    (12, 25, "Christmas Day"),
    (12, 26, "Second Christmas Day"),
];

pub fn german_fixed_holidays(year: i32) -> Vec<HolidayRecord> {
    GERMAN_FIXED_HOLIDAYS
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|d| HolidayRecord::new(d, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::german_fixed_holidays;

    #[test]
    fn template_has_five_holidays_in_the_requested_year() {
        let holidays = german_fixed_holidays(2026);
        assert_eq!(holidays.len(), 5);
        assert!(holidays.iter().all(|h| h.year() == 2026));
        assert_eq!(holidays[2].name(), "German Unity Day");
    }
}

use chrono::{Days, NaiveDate};

/// Inclusive span of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOfDates {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl RangeOfDates {
    /// January 1st through December 31st of `year`.
    pub fn year(year: i32) -> Option<RangeOfDates> {
        let start_date = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end_date = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(RangeOfDates { start_date, end_date })
    }

    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1) as usize
    }

    pub fn iter(&self) -> RangeOfDatesIterator<'_> {
        RangeOfDatesIterator {
            range_of_dates: self,
            index: 0,
        }
    }
}

pub struct RangeOfDatesIterator<'a> {
    range_of_dates: &'a RangeOfDates,
    index: usize,
}

impl<'a> Iterator for RangeOfDatesIterator<'a> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.range_of_dates.len() {
            let d = self
                .range_of_dates
                .start_date
                .checked_add_days(Days::new(self.index as u64));
            self.index += 1;
            d
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::RangeOfDates;

    #[test]
    fn year_range_spans_every_day() {
        assert_eq!(RangeOfDates::year(2024).unwrap().len(), 366);
        assert_eq!(RangeOfDates::year(2025).unwrap().iter().count(), 365);
    }

    #[test]
    fn iteration_runs_from_new_year_to_new_years_eve() {
        let range = RangeOfDates::year(2025).unwrap();
        let days: Vec<NaiveDate> = range.iter().collect();
        assert_eq!(days.first(), NaiveDate::from_ymd_opt(2025, 1, 1).as_ref());
        assert_eq!(days.last(), NaiveDate::from_ymd_opt(2025, 12, 31).as_ref());
    }
}

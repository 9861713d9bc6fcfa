use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::calendar::region::Region;

/// The user's booked vacation days together with the active region and the
/// days carried over from the previous year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationSelection {
    days: BTreeSet<NaiveDate>,
    region: Option<Region>,
    carryover: u32,
}

impl VacationSelection {
    pub fn new(region: Option<Region>, carryover: u32) -> VacationSelection {
        VacationSelection {
            days: BTreeSet::new(),
            region,
            carryover,
        }
    }

    pub fn with_days<I>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.days.extend(days);
        self
    }

    pub fn days(&self) -> &BTreeSet<NaiveDate> {
        &self.days
    }

    pub fn days_in_year(&self, year: i32) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied().filter(move |d| d.year() == year)
    }

    pub fn count_in_year(&self, year: i32) -> usize {
        self.days_in_year(year).count()
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.days.contains(&d)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn set_region(&mut self, region: Option<Region>) {
        self.region = region;
    }

    pub fn carryover(&self) -> u32 {
        self.carryover
    }

    pub fn set_carryover(&mut self, carryover: u32) {
        self.carryover = carryover;
    }

    pub(crate) fn insert(&mut self, d: NaiveDate) -> bool {
        self.days.insert(d)
    }

    pub(crate) fn remove(&mut self, d: NaiveDate) -> bool {
        self.days.remove(&d)
    }

    /// Drops every booked day of `year`, returning how many were removed.
    pub fn clear_year(&mut self, year: i32) -> usize {
        let before = self.days.len();
        self.days.retain(|d| d.year() != year);
        before - self.days.len()
    }
}

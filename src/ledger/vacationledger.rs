use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

use crate::calendar::catalogerror::NotFoundError;
use crate::calendar::holidaycalendar::WeekendMask;
use crate::calendar::holidaycatalog::HolidayCatalog;
use crate::calendar::region::Region;
use crate::ledger::selectionerror::{InvalidSelectionError, SelectionRejection};
use crate::ledger::vacationselection::VacationSelection;

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Why a stored vacation day no longer fits the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanReason {
    MissingRegion,
    NoHolidayData(NotFoundError),
    Weekend,
    Holiday { name: String },
}

/// A booked day flagged by `VacationLedger::orphaned_selections`. The day is
/// kept in the selection; the caller decides whether to drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedSelection {
    pub date: NaiveDate,
    pub reason: OrphanReason,
}

/// Bookkeeping of vacation days against a holiday catalog.
///
/// Only working days can be booked: not a weekend, not a holiday of the
/// region in that year, not booked already. Removing a booked day is always
/// allowed.
pub struct VacationLedger {
    catalog: Arc<HolidayCatalog>,
    weekends: WeekendMask,
    selection: VacationSelection,
}

impl VacationLedger {
    pub fn new(catalog: Arc<HolidayCatalog>, selection: VacationSelection) -> VacationLedger {
        VacationLedger {
            catalog,
            weekends: WeekendMask::default(),
            selection,
        }
    }

    pub fn catalog(&self) -> &HolidayCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &VacationSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut VacationSelection {
        &mut self.selection
    }

    pub fn into_selection(self) -> VacationSelection {
        self.selection
    }

    pub fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }

    /// Returns the first reason `d` cannot be booked for `region`, checking
    /// weekend, catalog coverage, holiday and existing booking in that order.
    pub fn check_selectable(&self, d: NaiveDate, region: &Region) -> Result<(), InvalidSelectionError> {
        if self.is_weekend(d) {
            return Err(InvalidSelectionError::new(d, SelectionRejection::Weekend));
        }
        let calendar = self
            .catalog
            .calendar_for(region, d.year())
            .map_err(|error| InvalidSelectionError::new(d, SelectionRejection::NoHolidayData(error)))?;
        if let Some(name) = calendar.holiday_name(d) {
            return Err(InvalidSelectionError::new(
                d,
                SelectionRejection::Holiday {
                    name: name.to_owned(),
                },
            ));
        }
        if self.selection.contains(d) {
            return Err(InvalidSelectionError::new(d, SelectionRejection::AlreadySelected));
        }
        Ok(())
    }

    pub fn is_selectable(&self, d: NaiveDate, region: &Region) -> bool {
        self.check_selectable(d, region).is_ok()
    }

    /// Books `d` when it is free, or releases it when it is already booked.
    /// A rejected booking leaves the selection unchanged.
    pub fn toggle(&mut self, d: NaiveDate, region: &Region) -> Result<Toggle, InvalidSelectionError> {
        if self.selection.remove(d) {
            debug!("event=day_deselected module=ledger date={}", d);
            return Ok(Toggle::Deselected);
        }
        if let Err(error) = self.check_selectable(d, region) {
            debug!(
                "event=selection_rejected module=ledger date={} region={} reason={}",
                d,
                region,
                error.reason.code()
            );
            return Err(error);
        }
        self.selection.insert(d);
        debug!("event=day_selected module=ledger date={} region={}", d, region);
        Ok(Toggle::Selected)
    }

    pub fn used_days(&self, year: i32) -> usize {
        self.selection.count_in_year(year)
    }

    /// `allotment + carryover - used`; negative when overbooked. Saturates at
    /// the bounds of `i32`.
    pub fn remaining_days(&self, year: i32, allotment: i32, carryover_from_previous_year: i32) -> i32 {
        let used = i32::try_from(self.used_days(year)).unwrap_or(i32::MAX);
        allotment
            .saturating_add(carryover_from_previous_year)
            .saturating_sub(used)
    }

    /// Unused days of the previous year, never below zero.
    pub fn carryover(previous_year_allotment: i32, previous_year_used: i32) -> i32 {
        previous_year_allotment
            .saturating_sub(previous_year_used)
            .max(0)
    }

    /// Booked days that the current catalog no longer accepts for the
    /// selection's region. Nothing is removed.
    pub fn orphaned_selections(&self) -> Vec<OrphanedSelection> {
        let orphans: Vec<OrphanedSelection> = self
            .selection
            .days()
            .iter()
            .filter_map(|&d| self.orphan_reason(d).map(|reason| OrphanedSelection { date: d, reason }))
            .collect();
        if !orphans.is_empty() {
            warn!(
                "event=orphaned_selections module=ledger count={}",
                orphans.len()
            );
        }
        orphans
    }

    fn orphan_reason(&self, d: NaiveDate) -> Option<OrphanReason> {
        let Some(region) = self.selection.region() else {
            return Some(OrphanReason::MissingRegion);
        };
        if self.is_weekend(d) {
            return Some(OrphanReason::Weekend);
        }
        match self.catalog.calendar_for(region, d.year()) {
            Err(error) => Some(OrphanReason::NoHolidayData(error)),
            Ok(calendar) => calendar
                .holiday_name(d)
                .map(|name| OrphanReason::Holiday { name: name.to_owned() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::{OrphanReason, Toggle, VacationLedger};
    use crate::calendar::catalogerror::NotFoundError;
    use crate::calendar::holidaycatalog::HolidayCatalog;
    use crate::calendar::region::Region;
    use crate::ledger::selectionerror::SelectionRejection;
    use crate::ledger::vacationselection::VacationSelection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Arc<HolidayCatalog> {
        let json = r#"{"berlin": {"2025": [{"date": "2025-01-01", "name": "New Year's Day"}]}}"#;
        Arc::new(HolidayCatalog::from_json_str(json).unwrap())
    }

    fn berlin() -> Region {
        Region::parse("berlin").unwrap()
    }

    #[test]
    fn berlin_new_year_scenario() {
        let mut ledger = VacationLedger::new(catalog(), VacationSelection::default());

        assert!(!ledger.is_selectable(date(2025, 1, 1), &berlin()));
        assert!(ledger.is_selectable(date(2025, 1, 2), &berlin()));

        assert_eq!(ledger.toggle(date(2025, 1, 2), &berlin()), Ok(Toggle::Selected));
        assert_eq!(ledger.remaining_days(2025, 30, 0), 29);

        let error = ledger.toggle(date(2025, 1, 1), &berlin()).unwrap_err();
        assert_eq!(error.reason.code(), "holiday");
        assert_eq!(ledger.selection().len(), 1);
    }

    #[test]
    fn weekend_takes_priority_over_other_reasons() {
        let ledger = VacationLedger::new(catalog(), VacationSelection::default());
        // 2025-01-04 is a Saturday; hamburg is not even in the catalog.
        let error = ledger.check_selectable(date(2025, 1, 4), &Region::parse("hamburg").unwrap()).unwrap_err();
        assert_eq!(error.reason, SelectionRejection::Weekend);
    }

    #[test]
    fn already_selected_day_is_not_selectable() {
        let mut ledger = VacationLedger::new(catalog(), VacationSelection::default());
        ledger.toggle(date(2025, 1, 3), &berlin()).unwrap();
        let error = ledger.check_selectable(date(2025, 1, 3), &berlin()).unwrap_err();
        assert_eq!(error.reason, SelectionRejection::AlreadySelected);
    }

    #[test]
    fn missing_year_is_reported_not_treated_as_holiday_free() {
        let mut ledger = VacationLedger::new(catalog(), VacationSelection::default());
        let error = ledger.toggle(date(2026, 1, 2), &berlin()).unwrap_err();
        assert_eq!(
            error.reason,
            SelectionRejection::NoHolidayData(NotFoundError::UnknownYear { region: berlin(), year: 2026 })
        );
        assert!(ledger.selection().is_empty());
    }

    #[test]
    fn deselect_is_always_allowed() {
        // A stored day that is now a holiday can still be removed.
        let selection = VacationSelection::new(Some(berlin()), 0).with_days([date(2025, 1, 1)]);
        let mut ledger = VacationLedger::new(catalog(), selection);
        assert_eq!(ledger.toggle(date(2025, 1, 1), &berlin()), Ok(Toggle::Deselected));
        assert!(ledger.selection().is_empty());
    }

    #[test]
    fn remaining_days_may_go_negative() {
        let selection = VacationSelection::default().with_days([date(2025, 1, 2), date(2025, 1, 3)]);
        let ledger = VacationLedger::new(catalog(), selection);
        assert_eq!(ledger.remaining_days(2025, 1, 0), -1);
        assert_eq!(ledger.remaining_days(2025, 30, 5), 33);
        assert_eq!(ledger.remaining_days(2026, 30, 0), 30);
    }

    #[test]
    fn carryover_is_clamped_at_zero() {
        assert_eq!(VacationLedger::carryover(30, 35), 0);
        assert_eq!(VacationLedger::carryover(30, 20), 10);
        assert_eq!(VacationLedger::carryover(30, 30), 0);
    }

    #[test]
    fn extreme_balances_saturate() {
        assert_eq!(VacationLedger::carryover(i32::MAX, -1), i32::MAX);
        assert_eq!(VacationLedger::carryover(i32::MIN, 1), 0);

        let selection = VacationSelection::default().with_days([date(2025, 1, 2)]);
        let ledger = VacationLedger::new(catalog(), selection);
        assert_eq!(ledger.remaining_days(2025, 30, i32::MAX), i32::MAX - 1);
        assert_eq!(ledger.remaining_days(2025, i32::MIN, 0), i32::MIN);
    }

    #[test]
    fn weekend_holiday_reports_weekend() {
        // 2025-03-08 is a Saturday and a Berlin holiday.
        let json = r#"{"berlin": {"2025": [{"date": "2025-03-08", "name": "International Women's Day"}]}}"#;
        let catalog = Arc::new(HolidayCatalog::from_json_str(json).unwrap());
        let ledger = VacationLedger::new(catalog, VacationSelection::default());
        let error = ledger.check_selectable(date(2025, 3, 8), &berlin()).unwrap_err();
        assert_eq!(error.reason, SelectionRejection::Weekend);
    }

    #[test]
    fn stored_holiday_reports_holiday_before_already_selected() {
        let selection = VacationSelection::new(Some(berlin()), 0).with_days([date(2025, 1, 1)]);
        let ledger = VacationLedger::new(catalog(), selection);
        let error = ledger.check_selectable(date(2025, 1, 1), &berlin()).unwrap_err();
        assert_eq!(
            error.reason,
            SelectionRejection::Holiday { name: "New Year's Day".to_owned() }
        );
    }

    #[test]
    fn orphaned_selections_are_flagged_but_kept() {
        let selection = VacationSelection::new(Some(berlin()), 0).with_days([
            date(2025, 1, 1),
            date(2025, 1, 2),
            date(2026, 1, 2),
        ]);
        let ledger = VacationLedger::new(catalog(), selection);
        let orphans = ledger.orphaned_selections();
        assert_eq!(orphans.len(), 2);
        assert_eq!(orphans[0].date, date(2025, 1, 1));
        assert_eq!(
            orphans[0].reason,
            OrphanReason::Holiday { name: "New Year's Day".to_owned() }
        );
        assert!(matches!(orphans[1].reason, OrphanReason::NoHolidayData(_)));
        assert_eq!(ledger.selection().len(), 3);
    }
}

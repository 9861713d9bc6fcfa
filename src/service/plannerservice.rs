use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::{info, warn};

use crate::calendar::holidaycalendar::RegionYearCalendar;
use crate::calendar::holidaycatalog::HolidayCatalog;
use crate::calendar::region::Region;
use crate::configuration::PlannerConfiguration;
use crate::ledger::vacationledger::{OrphanedSelection, Toggle, VacationLedger};
use crate::ledger::vacationselection::VacationSelection;
use crate::persistence::selectionstore::SelectionStore;
use crate::plannererror::PlannerError;

/// Figures shown for one planning year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    pub region: Region,
    pub allotment: i32,
    pub carryover: i32,
    pub booked: usize,
    pub remaining: i32,
    pub working_days: Option<usize>,
}

/// Headless planner session: one catalog, one ledger, one store.
///
/// Holds the policies that sit above the ledger: the active region, the
/// annual allotment, refusing bookings once the balance is used up, and
/// saving on shutdown.
pub struct PlannerService {
    ledger: VacationLedger,
    store: SelectionStore,
    allotment: u32,
    region: Region,
}

impl PlannerService {
    /// Loads the catalog (fatal on error) and the stored selection (falls back
    /// to empty on error). The stored region wins over the configured default.
    pub fn open(config: &PlannerConfiguration) -> Result<PlannerService, PlannerError> {
        let catalog = HolidayCatalog::from_reader(&config.holiday_config_path)?;
        let store = SelectionStore::new(config.selection_path.clone());
        let selection = store.load_or_default();
        Ok(PlannerService::with_parts(Arc::new(catalog), store, selection, config))
    }

    pub fn with_parts(
        catalog: Arc<HolidayCatalog>,
        store: SelectionStore,
        mut selection: VacationSelection,
        config: &PlannerConfiguration,
    ) -> PlannerService {
        let region = selection
            .region()
            .cloned()
            .unwrap_or_else(|| config.default_region.clone());
        selection.set_region(Some(region.clone()));
        let service = PlannerService {
            ledger: VacationLedger::new(catalog, selection),
            store,
            allotment: config.total_allotment,
            region,
        };
        let orphans = service.ledger.orphaned_selections();
        for orphan in orphans.iter() {
            warn!(
                "event=orphaned_selection module=service date={} reason={:?}",
                orphan.date, orphan.reason
            );
        }
        service
    }

    pub fn selection(&self) -> &VacationSelection {
        self.ledger.selection()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn carryover(&self) -> u32 {
        self.ledger.selection().carryover()
    }

    pub fn set_carryover(&mut self, carryover: u32) {
        self.ledger.selection_mut().set_carryover(carryover);
        info!("event=carryover_set module=service carryover={}", carryover);
    }

    pub fn remaining_days(&self, year: i32) -> i32 {
        self.ledger
            .remaining_days(year, day_count(self.allotment), day_count(self.carryover()))
    }

    pub fn calendar(&self, year: i32) -> Result<RegionYearCalendar, PlannerError> {
        Ok(self.ledger.catalog().calendar_for(&self.region, year)?)
    }

    pub fn summary(&self, year: i32) -> YearSummary {
        YearSummary {
            year,
            region: self.region.clone(),
            allotment: day_count(self.allotment),
            carryover: day_count(self.carryover()),
            booked: self.ledger.used_days(year),
            remaining: self.remaining_days(year),
            working_days: self.calendar(year).ok().map(|c| c.working_days()),
        }
    }

    /// Toggles `d` for the active region. A day the ledger would reject keeps
    /// its rejection reason; a valid new booking is refused once nothing
    /// remains for its year. Releasing a day always succeeds.
    pub fn toggle(&mut self, d: NaiveDate) -> Result<Toggle, PlannerError> {
        if !self.ledger.selection().contains(d) {
            self.ledger.check_selectable(d, &self.region)?;
            let remaining = self.remaining_days(d.year());
            if remaining <= 0 {
                warn!(
                    "event=budget_exhausted module=service date={} remaining={}",
                    d, remaining
                );
                return Err(PlannerError::BudgetExhausted {
                    year: d.year(),
                    remaining,
                });
            }
        }
        Ok(self.ledger.toggle(d, &self.region)?)
    }

    /// Drops every booked day of `year`, returning how many were removed.
    pub fn reset_year(&mut self, year: i32) -> usize {
        let removed = self.ledger.selection_mut().clear_year(year);
        info!(
            "event=year_reset module=service year={} removed={}",
            year, removed
        );
        removed
    }

    /// Makes `region` the active region. With `save_first`, the current
    /// selection is persisted before switching.
    pub fn switch_region(&mut self, region: Region, save_first: bool) -> Result<(), PlannerError> {
        if save_first {
            self.save()?;
        }
        self.ledger.selection_mut().set_region(Some(region.clone()));
        info!(
            "event=region_switched module=service from={} to={}",
            self.region, region
        );
        self.region = region;
        Ok(())
    }

    pub fn orphaned_selections(&self) -> Vec<OrphanedSelection> {
        self.ledger.orphaned_selections()
    }

    pub fn save(&self) -> Result<(), PlannerError> {
        Ok(self.store.save(self.ledger.selection())?)
    }

    /// Saves on shutdown. A failed save is logged and returned; the in-memory
    /// selection is handed back either way.
    pub fn close(self) -> (VacationSelection, Result<(), PlannerError>) {
        let result = self.save();
        if let Err(error) = &result {
            warn!("event=save_on_close module=service status=error error={}", error);
        }
        (self.ledger.into_selection(), result)
    }
}

/// Day counts above `i32::MAX` are clamped.
fn day_count(days: u32) -> i32 {
    i32::try_from(days).unwrap_or(i32::MAX)
}

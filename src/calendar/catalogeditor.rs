use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::calendar::catalogerror::{CatalogEditError, ConfigLoadError};
use crate::calendar::holidaycatalog::{HolidayCatalog, validate_records};
use crate::calendar::holidayrecord::HolidayRecord;
use crate::calendar::holidaytemplate::german_fixed_holidays;
use crate::calendar::region::Region;
use crate::persistence::atomicfile::write_json_atomic;

/// Maintains the holiday configuration file.
///
/// This is the only writer of the catalog source; a running planner only
/// ever reads it. Every edit is validated against the loading rules so the
/// saved file always loads again.
pub struct HolidayCatalogEditor {
    path: PathBuf,
    catalog: HolidayCatalog,
}

impl HolidayCatalogEditor {
    /// Opens the configuration at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<HolidayCatalogEditor, ConfigLoadError> {
        let path = path.as_ref().to_path_buf();
        let catalog = if path.exists() {
            HolidayCatalog::from_reader(&path)?
        } else {
            info!(
                "event=catalog_open module=calendar status=new path={}",
                path.display()
            );
            HolidayCatalog::new()
        };
        Ok(HolidayCatalogEditor { path, catalog })
    }

    pub fn catalog(&self) -> &HolidayCatalog {
        &self.catalog
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_region(&mut self, region: &Region) -> Result<(), CatalogEditError> {
        if !self.catalog.insert_region(region.clone()) {
            return Err(CatalogEditError::RegionExists(region.clone()));
        }
        info!("event=region_added module=calendar region={}", region);
        Ok(())
    }

    /// Sets the holidays of `region` in `year`, creating the region when needed
    /// and replacing any list already stored for that year.
    pub fn add_year(&mut self, region: &Region, year: i32, records: Vec<HolidayRecord>) -> Result<(), CatalogEditError> {
        let issues = validate_records(region, year, &records);
        if !issues.is_empty() {
            return Err(CatalogEditError::InvalidRecords {
                region: region.clone(),
                year,
                issues,
            });
        }
        let count = records.len();
        let records: BTreeSet<HolidayRecord> = records.into_iter().collect();
        if self.catalog.insert_year(region.clone(), year, records) {
            warn!(
                "event=year_overwritten module=calendar region={} year={}",
                region, year
            );
        }
        info!(
            "event=year_added module=calendar region={} year={} holidays={}",
            region, year, count
        );
        Ok(())
    }

    pub fn add_german_template(&mut self, region: &Region, year: i32) -> Result<(), CatalogEditError> {
        self.add_year(region, year, german_fixed_holidays(year))
    }

    pub fn remove_region(&mut self, region: &Region) -> Result<(), CatalogEditError> {
        self.catalog.remove_region(region)?;
        info!("event=region_removed module=calendar region={}", region);
        Ok(())
    }

    pub fn remove_year(&mut self, region: &Region, year: i32) -> Result<(), CatalogEditError> {
        self.catalog.remove_year(region, year)?;
        info!(
            "event=year_removed module=calendar region={} year={}",
            region, year
        );
        Ok(())
    }

    pub fn save(&self) -> io::Result<()> {
        write_json_atomic(&self.path, &self.catalog.to_json_value())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::HolidayCatalogEditor;
    use crate::calendar::catalogerror::{CatalogEditError, IssueKind, NotFoundError};
    use crate::calendar::holidaycatalog::HolidayCatalog;
    use crate::calendar::holidayrecord::HolidayRecord;
    use crate::calendar::region::Region;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn edits_are_saved_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("holidays.json");
        let bavaria = Region::parse("Bavaria").unwrap();

        let mut editor = HolidayCatalogEditor::open(&path).unwrap();
        editor.add_region(&bavaria).unwrap();
        editor
            .add_year(&bavaria, 2026, vec![HolidayRecord::new(date(2026, 1, 6), "Epiphany")])
            .unwrap();
        editor.add_german_template(&Region::parse("hamburg").unwrap(), 2026).unwrap();
        editor.save().unwrap();

        let catalog = HolidayCatalog::from_reader(&path).unwrap();
        assert_eq!(catalog.holidays_for(&Region::parse("bavaria").unwrap(), 2026).unwrap().len(), 1);
        assert_eq!(catalog.holidays_for(&Region::parse("hamburg").unwrap(), 2026).unwrap().len(), 5);
    }

    #[test]
    fn adding_an_existing_region_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = HolidayCatalogEditor::open(dir.path().join("h.json")).unwrap();
        editor.add_region(&Region::parse("berlin").unwrap()).unwrap();
        assert!(matches!(
            editor.add_region(&Region::parse("BERLIN").unwrap()),
            Err(CatalogEditError::RegionExists(_))
        ));
    }

    #[test]
    fn add_year_rejects_dates_outside_the_year() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = HolidayCatalogEditor::open(dir.path().join("h.json")).unwrap();
        let error = editor
            .add_year(&Region::parse("berlin").unwrap(), 2026, vec![HolidayRecord::new(date(2025, 1, 1), "Old")])
            .unwrap_err();
        match error {
            CatalogEditError::InvalidRecords { issues, .. } => {
                assert_eq!(issues[0].kind, IssueKind::DateOutsideYear(date(2025, 1, 1)));
            },
            other => panic!("unexpected error: {other}"),
        }
        assert!(editor.catalog().is_empty());
    }

    #[test]
    fn years_without_four_digits_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        let berlin = Region::parse("berlin").unwrap();
        let mut editor = HolidayCatalogEditor::open(&path).unwrap();
        for year in [999, -5, 10000] {
            match editor.add_german_template(&berlin, year).unwrap_err() {
                CatalogEditError::InvalidRecords { issues, .. } => {
                    assert_eq!(issues[0].kind, IssueKind::InvalidYearKey);
                },
                other => panic!("unexpected error: {other}"),
            }
        }
        assert!(editor.catalog().is_empty());

        editor.add_german_template(&berlin, 1000).unwrap();
        editor.save().unwrap();
        assert!(HolidayCatalog::from_reader(&path).is_ok());
    }

    #[test]
    fn add_year_overwrites_existing_year() {
        let dir = tempfile::tempdir().unwrap();
        let berlin = Region::parse("berlin").unwrap();
        let mut editor = HolidayCatalogEditor::open(dir.path().join("h.json")).unwrap();
        editor.add_german_template(&berlin, 2026).unwrap();
        editor
            .add_year(&berlin, 2026, vec![HolidayRecord::new(date(2026, 3, 8), "Women's Day")])
            .unwrap();
        assert_eq!(editor.catalog().holidays_for(&berlin, 2026).unwrap().len(), 1);
    }

    #[test]
    fn removing_missing_entries_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let berlin = Region::parse("berlin").unwrap();
        let mut editor = HolidayCatalogEditor::open(dir.path().join("h.json")).unwrap();
        assert!(matches!(
            editor.remove_region(&berlin),
            Err(CatalogEditError::NotFound(NotFoundError::UnknownRegion(_)))
        ));
        editor.add_region(&berlin).unwrap();
        assert!(matches!(
            editor.remove_year(&berlin, 2030),
            Err(CatalogEditError::NotFound(NotFoundError::UnknownYear { year: 2030, .. }))
        ));
        editor.remove_region(&berlin).unwrap();
        assert!(editor.catalog().is_empty());
    }
}

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use log::{error, info};
use serde_json::{Map, Value};

use crate::calendar::catalogerror::{CatalogIssue, ConfigLoadError, IssueKind, NotFoundError};
use crate::calendar::holidaycalendar::RegionYearCalendar;
use crate::calendar::holidayrecord::{DATE_FORMAT, HolidayRecord};
use crate::calendar::region::Region;

/// Region → year → holidays, loaded once and read-only for the planner.
///
/// The source document is a JSON object keyed by region name, each region an
/// object keyed by four-digit year, each year a list of `{"date", "name"}`
/// entries:
///
/// ```text
/// { "berlin": { "2025": [ { "date": "2025-01-01", "name": "New Year's Day" } ] } }
/// ```
///
/// Loading validates the whole document and reports every malformed entry at
/// once; a catalog is never built from a partially valid source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCatalog {
    regions: BTreeMap<Region, BTreeMap<i32, BTreeSet<HolidayRecord>>>,
}

impl HolidayCatalog {
    pub fn new() -> HolidayCatalog {
        HolidayCatalog::default()
    }

    pub fn from_reader(file_path: impl AsRef<Path>) -> Result<HolidayCatalog, ConfigLoadError> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let json_value: Value = serde_json::from_reader(reader)?;
        let catalog = HolidayCatalog::from_json_value(json_value)?;
        info!(
            "event=catalog_load module=calendar status=ok path={} regions={}",
            path.display(),
            catalog.regions.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<HolidayCatalog, ConfigLoadError> {
        let json_value: Value = serde_json::from_str(json)?;
        HolidayCatalog::from_json_value(json_value)
    }

    pub fn from_json_value(json_value: Value) -> Result<HolidayCatalog, ConfigLoadError> {
        let region_map: Map<String, Value> = serde_json::from_value(json_value)?;
        let mut regions: BTreeMap<Region, BTreeMap<i32, BTreeSet<HolidayRecord>>> = BTreeMap::new();
        let mut issues: Vec<CatalogIssue> = Vec::new();

        for (region_key, years_value) in region_map.iter() {
            let Ok(region) = Region::parse(region_key) else {
                issues.push(CatalogIssue::new(region_key, None, None, IssueKind::InvalidRegionName));
                continue;
            };
            if regions.contains_key(&region) {
                issues.push(CatalogIssue::new(region_key, None, None, IssueKind::DuplicateRegion));
                continue;
            }
            let Some(year_map) = years_value.as_object() else {
                issues.push(CatalogIssue::new(region_key, None, None, IssueKind::NotAnObject));
                continue;
            };

            let mut years: BTreeMap<i32, BTreeSet<HolidayRecord>> = BTreeMap::new();
            for (year_key, entries_value) in year_map.iter() {
                let Some(year) = parse_year_key(year_key) else {
                    issues.push(CatalogIssue::new(region_key, Some(year_key), None, IssueKind::InvalidYearKey));
                    continue;
                };
                let Some(entries) = entries_value.as_array() else {
                    issues.push(CatalogIssue::new(region_key, Some(year_key), None, IssueKind::NotAnArray));
                    continue;
                };
                let (records, mut entry_issues) = parse_year_entries(region_key, year_key, year, entries);
                issues.append(&mut entry_issues);
                years.insert(year, records);
            }
            regions.insert(region, years);
        }

        if !issues.is_empty() {
            error!(
                "event=catalog_load module=calendar status=error issues={}",
                issues.len()
            );
            return Err(ConfigLoadError::Malformed(issues));
        }
        Ok(HolidayCatalog { regions })
    }

    /// Holidays of `region` in `year`, in date order.
    pub fn holidays_for(&self, region: &Region, year: i32) -> Result<&BTreeSet<HolidayRecord>, NotFoundError> {
        let years = self
            .regions
            .get(region)
            .ok_or_else(|| NotFoundError::UnknownRegion(region.clone()))?;
        years.get(&year).ok_or_else(|| NotFoundError::UnknownYear {
            region: region.clone(),
            year,
        })
    }

    pub fn calendar_for(&self, region: &Region, year: i32) -> Result<RegionYearCalendar, NotFoundError> {
        let records = self.holidays_for(region, year)?;
        Ok(RegionYearCalendar::new(year, records.iter()))
    }

    pub fn holiday_name(&self, d: NaiveDate, region: &Region) -> Option<&str> {
        self.holidays_for(region, d.year())
            .ok()?
            .iter()
            .find(|r| r.date() == d)
            .map(|r| r.name())
    }

    pub fn regions(&self) -> Vec<&Region> {
        self.regions.keys().collect()
    }

    pub fn years(&self, region: &Region) -> Result<Vec<i32>, NotFoundError> {
        self.regions
            .get(region)
            .map(|years| years.keys().copied().collect())
            .ok_or_else(|| NotFoundError::UnknownRegion(region.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The document form accepted by `from_json_value`.
    pub fn to_json_value(&self) -> Value {
        let mut region_map = Map::new();
        for (region, years) in self.regions.iter() {
            let mut year_map = Map::new();
            for (year, records) in years.iter() {
                let entries = records
                    .iter()
                    .map(|r| {
                        let mut entry = Map::new();
                        entry.insert("date".to_owned(), Value::String(r.date().format(DATE_FORMAT).to_string()));
                        entry.insert("name".to_owned(), Value::String(r.name().to_owned()));
                        Value::Object(entry)
                    })
                    .collect();
                year_map.insert(year.to_string(), Value::Array(entries));
            }
            region_map.insert(region.as_str().to_owned(), Value::Object(year_map));
        }
        Value::Object(region_map)
    }

    pub(crate) fn insert_region(&mut self, region: Region) -> bool {
        if self.regions.contains_key(&region) {
            return false;
        }
        self.regions.insert(region, BTreeMap::new());
        true
    }

    /// Replaces the holidays of `year`, returning whether a previous list existed.
    pub(crate) fn insert_year(&mut self, region: Region, year: i32, records: BTreeSet<HolidayRecord>) -> bool {
        self.regions
            .entry(region)
            .or_default()
            .insert(year, records)
            .is_some()
    }

    pub(crate) fn remove_region(&mut self, region: &Region) -> Result<(), NotFoundError> {
        self.regions
            .remove(region)
            .map(|_| ())
            .ok_or_else(|| NotFoundError::UnknownRegion(region.clone()))
    }

    pub(crate) fn remove_year(&mut self, region: &Region, year: i32) -> Result<(), NotFoundError> {
        let years = self
            .regions
            .get_mut(region)
            .ok_or_else(|| NotFoundError::UnknownRegion(region.clone()))?;
        years
            .remove(&year)
            .map(|_| ())
            .ok_or_else(|| NotFoundError::UnknownYear {
                region: region.clone(),
                year,
            })
    }
}

/// Years a catalog document can key: exactly four digits.
pub const CATALOG_YEARS: RangeInclusive<i32> = 1000..=9999;

fn parse_year_key(year_key: &str) -> Option<i32> {
    if year_key.len() != 4 || !year_key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year_key.parse().ok().filter(|year| CATALOG_YEARS.contains(year))
}

fn parse_year_entries(
    region_key: &str,
    year_key: &str,
    year: i32,
    entries: &[Value],
) -> (BTreeSet<HolidayRecord>, Vec<CatalogIssue>) {
    let mut records = BTreeSet::new();
    let mut issues = Vec::new();
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let issue = |index: usize, kind: IssueKind| CatalogIssue::new(region_key, Some(year_key), Some(index), kind);

    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            issues.push(issue(index, IssueKind::NotAnObject));
            continue;
        };

        let date = match object.get("date").and_then(Value::as_str) {
            None => {
                issues.push(issue(index, IssueKind::MissingDate));
                None
            },
            Some(text) => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
                Ok(d) if d.year() != year => {
                    issues.push(issue(index, IssueKind::DateOutsideYear(d)));
                    None
                },
                Ok(d) => Some(d),
                Err(_) => {
                    issues.push(issue(index, IssueKind::InvalidDate(text.to_owned())));
                    None
                }
            }
        };
        let name = object.get("name").and_then(Value::as_str);
        if name.is_none() {
            issues.push(issue(index, IssueKind::MissingName));
        }

        if let (Some(d), Some(name)) = (date, name) {
            if !seen.insert(d) {
                issues.push(issue(index, IssueKind::DuplicateDate(d)));
                continue;
            }
            records.insert(HolidayRecord::new(d, name));
        }
    }
    (records, issues)
}

/// Checks typed records destined for `region`/`year` with the same rules as loading.
pub(crate) fn validate_records(region: &Region, year: i32, records: &[HolidayRecord]) -> Vec<CatalogIssue> {
    let year_key = year.to_string();
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut issues = Vec::new();
    if !CATALOG_YEARS.contains(&year) {
        issues.push(CatalogIssue::new(region.as_str(), Some(&year_key), None, IssueKind::InvalidYearKey));
    }
    for (index, record) in records.iter().enumerate() {
        if record.year() != year {
            issues.push(CatalogIssue::new(region.as_str(), Some(&year_key), Some(index), IssueKind::DateOutsideYear(record.date())));
        } else if !seen.insert(record.date()) {
            issues.push(CatalogIssue::new(region.as_str(), Some(&year_key), Some(index), IssueKind::DuplicateDate(record.date())));
        }
    }
    issues
}

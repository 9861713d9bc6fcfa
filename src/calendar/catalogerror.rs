use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::region::Region;

/// What is wrong with a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    InvalidRegionName,
    DuplicateRegion,
    InvalidYearKey,
    NotAnObject,
    NotAnArray,
    MissingDate,
    InvalidDate(String),
    DateOutsideYear(NaiveDate),
    MissingName,
    DuplicateDate(NaiveDate),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::InvalidRegionName => write!(f, "region name is empty"),
            IssueKind::DuplicateRegion => write!(f, "region defined more than once"),
            IssueKind::InvalidYearKey => write!(f, "year key is not a four-digit year"),
            IssueKind::NotAnObject => write!(f, "entry is not an object"),
            IssueKind::NotAnArray => write!(f, "year entry is not a list"),
            IssueKind::MissingDate => write!(f, "missing field 'date'"),
            IssueKind::InvalidDate(text) => write!(f, "invalid date '{}', expected YYYY-MM-DD", text),
            IssueKind::DateOutsideYear(d) => write!(f, "date {} lies outside its year", d),
            IssueKind::MissingName => write!(f, "missing field 'name'"),
            IssueKind::DuplicateDate(d) => write!(f, "date {} listed more than once", d),
        }
    }
}

/// Location and cause of one malformed catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub region: String,
    pub year: Option<String>,
    pub index: Option<usize>,
    pub kind: IssueKind,
}

impl CatalogIssue {
    pub fn new(region: &str, year: Option<&str>, index: Option<usize>, kind: IssueKind) -> CatalogIssue {
        CatalogIssue {
            region: region.to_owned(),
            year: year.map(|y| y.to_owned()),
            index,
            kind,
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.region)?;
        if let Some(year) = &self.year {
            write!(f, "/{}", year)?;
        }
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        write!(f, ": {}", self.kind)
    }
}

fn join_issues(issues: &[CatalogIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The catalog source could not be turned into a catalog. Fatal to startup.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read holiday configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("holiday configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("holiday configuration has {} malformed entries: {}", .0.len(), join_issues(.0))]
    Malformed(Vec<CatalogIssue>),
}

impl ConfigLoadError {
    pub fn issues(&self) -> &[CatalogIssue] {
        match self {
            ConfigLoadError::Malformed(issues) => issues,
            _ => &[],
        }
    }
}

/// A lookup asked for a region or year the catalog does not define.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("region '{0}' not found in holiday configuration")]
    UnknownRegion(Region),
    #[error("no holidays defined for {region} in {year}")]
    UnknownYear { region: Region, year: i32 },
}

/// Rejections raised while editing the catalog.
#[derive(Debug, Error)]
pub enum CatalogEditError {
    #[error("region '{0}' already exists")]
    RegionExists(Region),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("invalid holidays for {region}/{year}: {}", join_issues(.issues))]
    InvalidRecords {
        region: Region,
        year: i32,
        issues: Vec<CatalogIssue>,
    },
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{CatalogIssue, ConfigLoadError, IssueKind};

    #[test]
    fn malformed_error_lists_every_issue() {
        let error = ConfigLoadError::Malformed(vec![
            CatalogIssue::new("berlin", Some("2025"), Some(0), IssueKind::MissingName),
            CatalogIssue::new(
                "berlin",
                Some("2025"),
                Some(2),
                IssueKind::DateOutsideYear(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            ),
        ]);
        let message = error.to_string();
        assert!(message.contains("2 malformed entries"));
        assert!(message.contains("berlin/2025[0]: missing field 'name'"));
        assert!(message.contains("berlin/2025[2]: date 2024-12-31 lies outside its year"));
        assert_eq!(error.issues().len(), 2);
    }
}

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::calendar::region::Region;
use crate::ledger::vacationselection::VacationSelection;
use crate::persistence::atomicfile::write_json_atomic;
use crate::persistence::persistenceerror::PersistenceError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct SelectionFileOut<'a> {
    selected_days: Vec<NaiveDate>,
    region: Option<&'a Region>,
    carryover: u32,
    last_updated: String,
}

/// On-disk layout. The `holidays1`/`holidays2`/`previous_year` fields are the
/// older split-by-year layout and are merged on read.
#[derive(Deserialize)]
struct SelectionFileIn {
    #[serde(default)]
    selected_days: Vec<NaiveDate>,
    #[serde(default)]
    holidays1: Vec<NaiveDate>,
    #[serde(default)]
    holidays2: Vec<NaiveDate>,
    #[serde(default)]
    region: Option<Region>,
    #[serde(default, alias = "previous_year")]
    carryover: u32,
    #[serde(default)]
    last_updated: Option<String>,
}

impl SelectionFileIn {
    fn into_selection(self) -> VacationSelection {
        VacationSelection::new(self.region, self.carryover).with_days(
            self.selected_days
                .into_iter()
                .chain(self.holidays1)
                .chain(self.holidays2),
        )
    }
}

/// JSON file holding the user's vacation selection.
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> SelectionStore {
        SelectionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored selection. A missing file is not an error and yields
    /// an empty selection without region and with zero carryover.
    pub fn load(&self) -> Result<VacationSelection, PersistenceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "event=selection_load module=persistence status=empty path={}",
                    self.path.display()
                );
                return Ok(VacationSelection::default());
            },
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let file_in: SelectionFileIn =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Json {
                path: self.path.clone(),
                source,
            })?;
        if let Some(last_updated) = &file_in.last_updated {
            info!(
                "event=selection_load module=persistence status=ok path={} last_updated={}",
                self.path.display(),
                last_updated
            );
        }
        Ok(file_in.into_selection())
    }

    /// Like `load`, but an unreadable or corrupt file falls back to an empty
    /// selection after logging a warning.
    pub fn load_or_default(&self) -> VacationSelection {
        self.load().unwrap_or_else(|error| {
            warn!(
                "event=selection_load module=persistence status=fallback error={}",
                error
            );
            VacationSelection::default()
        })
    }

    /// Replaces the stored selection. On failure the previous file is left intact.
    pub fn save(&self, selection: &VacationSelection) -> Result<(), PersistenceError> {
        let file_out = SelectionFileOut {
            selected_days: selection.days().iter().copied().collect(),
            region: selection.region(),
            carryover: selection.carryover(),
            last_updated: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        write_json_atomic(&self.path, &file_out).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "event=selection_save module=persistence status=ok path={} days={}",
            self.path.display(),
            selection.len()
        );
        Ok(())
    }

    /// Deletes the stored selection; an absent file counts as cleared.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

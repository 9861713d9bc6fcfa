use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::region::Region;

pub const DEFAULT_HOLIDAY_CONFIG_PATH: &str = "config/holidays.json";
pub const DEFAULT_SELECTION_PATH: &str = "data/holidays_status.json";
pub const DEFAULT_TOTAL_ALLOTMENT: u32 = 30;
pub const DEFAULT_REGION: &str = "berlin";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot read planner configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("planner configuration '{path}' is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Planner settings. Every field is optional in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfiguration {
    pub holiday_config_path: PathBuf,
    pub selection_path: PathBuf,
    pub total_allotment: u32,
    pub default_region: Region,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for PlannerConfiguration {
    fn default() -> Self {
        PlannerConfiguration {
            holiday_config_path: PathBuf::from(DEFAULT_HOLIDAY_CONFIG_PATH),
            selection_path: PathBuf::from(DEFAULT_SELECTION_PATH),
            total_allotment: DEFAULT_TOTAL_ALLOTMENT,
            default_region: Region::from_static(DEFAULT_REGION),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            log_dir: None,
        }
    }
}

impl PlannerConfiguration {
    pub fn new() -> PlannerConfiguration {
        PlannerConfiguration::default()
    }

    /// Reads the configuration file. Relative paths inside it are resolved
    /// against the directory holding the file.
    pub fn from_reader(file_path: impl AsRef<Path>) -> Result<PlannerConfiguration, ConfigurationError> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut config: PlannerConfiguration =
            serde_json::from_reader(reader).map_err(|source| ConfigurationError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// `from_reader` when the file exists, defaults otherwise.
    pub fn load_or_default(file_path: impl AsRef<Path>) -> Result<PlannerConfiguration, ConfigurationError> {
        let path = file_path.as_ref();
        if path.exists() {
            PlannerConfiguration::from_reader(path)
        } else {
            Ok(PlannerConfiguration::default())
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.holiday_config_path);
        resolve(&mut self.selection_path);
        if let Some(log_dir) = self.log_dir.as_mut() {
            resolve(log_dir);
        }
    }
}

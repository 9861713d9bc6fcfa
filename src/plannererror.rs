use thiserror::Error;

use crate::calendar::catalogerror::{CatalogEditError, ConfigLoadError, NotFoundError};
use crate::configuration::ConfigurationError;
use crate::ledger::selectionerror::InvalidSelectionError;
use crate::logging::LoggingError;
use crate::persistence::persistenceerror::PersistenceError;

/// Every failure the planner can report, one variant per concern.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    ConfigLoad(#[from] ConfigLoadError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    CatalogEdit(#[from] CatalogEditError),
    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelectionError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("no more vacation days left for {year} (remaining: {remaining})")]
    BudgetExhausted { year: i32, remaining: i32 },
}

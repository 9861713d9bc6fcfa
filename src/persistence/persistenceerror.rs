use std::path::PathBuf;

use thiserror::Error;

/// Reading or writing the persisted selection failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot access selection file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("selection file '{path}' is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

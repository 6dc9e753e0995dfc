use shared::RecordId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bad user-supplied values. Always raised before anything is mutated.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Record {0} not found")]
    NotFound(RecordId),

    #[error("Failed to read ledger file '{}': {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write ledger file '{}': {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV data format error in '{}': {message}", .path.display())]
    CsvDataFormat { path: PathBuf, message: String },
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }

    pub(crate) fn csv_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EngineError::CsvDataFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors caused by the operator's input rather than by the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(self, EngineError::InvalidInput(_) | EngineError::NotFound(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

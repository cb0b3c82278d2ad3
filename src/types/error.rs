//! Error types for store, registry and command operations

use rusqlite::ErrorCode;

/// Result type for store and orchestration operations
pub type SwitchResult<T> = Result<T, SwitchError>;

/// Errors that can occur while reading or changing switch state
#[derive(Debug)]
pub enum SwitchError {
    /// Lookup by id, path or group matched nothing
    NotFound(String),
    /// Malformed template path, invalid mode literal, bad argument
    InvalidInput(String),
    /// Id or path collision
    Duplicate(String),
    /// SQLite failure; the surrounding transaction was rolled back
    Storage(rusqlite::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Persisted data that cannot be decoded, or a broken log invariant
    Corrupt(String),
}

impl SwitchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SwitchError::NotFound(_))
    }

    /// Translate a constraint violation into `Duplicate`, pass everything else through
    pub(crate) fn from_insert(e: rusqlite::Error, what: impl FnOnce() -> String) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                SwitchError::Duplicate(what())
            }
            _ => SwitchError::Storage(e),
        }
    }
}

impl std::fmt::Display for SwitchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SwitchError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SwitchError::Duplicate(msg) => write!(f, "Already exists: {}", msg),
            SwitchError::Storage(e) => write!(f, "Storage error: {}", e),
            SwitchError::Io(e) => write!(f, "IO error: {}", e),
            SwitchError::Json(e) => write!(f, "JSON error: {}", e),
            SwitchError::Corrupt(msg) => write!(f, "Corrupt state: {}", msg),
        }
    }
}

impl std::error::Error for SwitchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwitchError::Storage(e) => Some(e),
            SwitchError::Io(e) => Some(e),
            SwitchError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for SwitchError {
    fn from(e: rusqlite::Error) -> Self {
        SwitchError::Storage(e)
    }
}

impl From<std::io::Error> for SwitchError {
    fn from(e: std::io::Error) -> Self {
        SwitchError::Io(e)
    }
}

impl From<serde_json::Error> for SwitchError {
    fn from(e: serde_json::Error) -> Self {
        SwitchError::Json(e)
    }
}

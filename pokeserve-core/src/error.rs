use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure outcomes of core operations.
///
/// Misses on lookups are not errors: "get" operations return `Ok(None)`.
/// `NotFound` is reserved for writes that target an entity which does not exist.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input. The message is safe to show to the caller.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("credential hashing failed: {0}")]
    Hash(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid enemy seed data: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Which storage constraint a failed statement tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    PrimaryKey,
    ForeignKey,
    Other,
}

impl Error {
    /// Classifies a constraint violation reported by the store, if this is one.
    pub fn constraint(&self) -> Option<Constraint> {
        let Self::Storage(rusqlite::Error::SqliteFailure(err, _)) = self else {
            return None;
        };
        if err.code != ErrorCode::ConstraintViolation {
            return None;
        }
        Some(match err.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => Constraint::Unique,
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Constraint::PrimaryKey,
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
            _ => Constraint::Other,
        })
    }

    /// True for failures that are the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Hash(_) | Self::Io(_) | Self::Seed(_)
        )
    }
}

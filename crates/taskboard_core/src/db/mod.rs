//! Board database bootstrap.
//!
//! Opens SQLite connections for snapshot storage and brings their schema up
//! to the version this build understands. The schema version lives in
//! `PRAGMA user_version`; a repository only accepts a connection whose
//! version matches [`migrations::latest_version`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating a board database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement outside any migration step.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; nothing was changed.
    SchemaTooNew { found: u32, supported: u32 },
    /// Migration `version` failed; the whole upgrade was rolled back.
    MigrationFailed {
        version: u32,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
            Self::MigrationFailed { .. } => "db_migration_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "board database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "board database is at schema {found}, this build reads up to {supported}"
            ),
            Self::MigrationFailed { version, source } => {
                write!(f, "board schema migration {version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::MigrationFailed { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

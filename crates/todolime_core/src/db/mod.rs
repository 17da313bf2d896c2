//! Task snapshot database.
//!
//! One SQLite file holds every task snapshot as a row of `kv_entries`,
//! keyed by `todolime-tasks` or `todolime-tasks:<uid>`. Values are the
//! JSON arrays written by the snapshot repository; this module only opens
//! the file and keeps its schema current.
//!
//! A file stamped (`PRAGMA user_version`) by a newer build is refused, so
//! snapshots are never read through an older schema.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the snapshot database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's schema stamp is ahead of this build's migrations.
    NewerSnapshotSchema { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "snapshot database error: {err}"),
            Self::NewerSnapshotSchema { found, supported } => write!(
                f,
                "snapshot database uses schema {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NewerSnapshotSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::errors::ServerError;

/// Handle on the planning SQLite file. The dataset is read-only, so each
/// call opens its own read-only connection.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Provides a read-only connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Connection) -> Result<T, ServerError>,
    {
        if !self.path.exists() {
            return Err(ServerError::Schema(format!(
                "Missing {}. Put the planning dataset there or set PLANNING_DB_PATH",
                self.path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;

        f(&conn)
    }
}

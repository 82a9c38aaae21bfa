pub mod constants;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod query;
pub mod recommend;
pub mod report;
pub mod service;
pub mod stats;
#[cfg(test)]
mod test_utils;
pub mod validation;

use crate::db::{Database, migrations};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors on the way to a usable database.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Could not create data directory: {0}")]
    DataDirCreation(std::io::Error),

    #[error("Failed to open database: {0}")]
    DatabaseOpen(rusqlite::Error),

    #[error("Failed to run database migrations: {0}")]
    Migration(rusqlite::Error),
}

/// Resolve the per-OS location of the database file, creating the data
/// directory if needed.
pub fn get_db_path() -> Result<PathBuf, InitError> {
    let proj_dirs = ProjectDirs::from("com", "logbook", "Logbook")
        .ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join("logbook.db"))
}

/// Open the database at its default location, run migrations, and wrap
/// it for sharing across worker threads.
pub fn init() -> Result<Arc<Mutex<Database>>, InitError> {
    let db_path = get_db_path()?;
    init_at(&db_path)
}

/// Like [`init`], but at an explicit path.
pub fn init_at(db_path: &PathBuf) -> Result<Arc<Mutex<Database>>, InitError> {
    let db = Database::open(db_path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection()).map_err(InitError::Migration)?;
    Ok(Arc::new(Mutex::new(db)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_at_opens_and_migrates() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("logbook.db");

        let db = init_at(&db_path).unwrap();
        let types = service::list_types(&db).unwrap();
        assert!(!types.is_empty());
    }
}

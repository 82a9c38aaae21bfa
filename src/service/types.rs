use crate::db::{Database, with_connection};
use crate::error::{AppError, is_unique_violation};
use crate::models::ActivityType;
use crate::validation::validate_type_name;
use std::sync::{Arc, Mutex};

use super::SaveOutcome;

pub fn list_types(db: &Arc<Mutex<Database>>) -> Result<Vec<String>, AppError> {
    let types = with_connection(db, "load activity types", ActivityType::find_all)?;
    Ok(types.into_iter().map(|t| t.name).collect())
}

/// Re-seed any missing canonical type. Called on startup; harmless at
/// any other time.
pub fn synchronize_types(db: &Arc<Mutex<Database>>) -> Result<(), AppError> {
    with_connection(db, "synchronize activity types", ActivityType::synchronize)
}

pub fn add_type(db: &Arc<Mutex<Database>>, name: &str) -> Result<(), AppError> {
    let name = validate_type_name(name)?;

    with_connection(db, "add activity type", |conn| {
        ActivityType::insert(conn, name)
    })
    .map_err(|e| match &e {
        AppError::Database(db_err) if is_unique_violation(db_err) => {
            AppError::AlreadyExists { name: name.into() }
        }
        _ => e,
    })
}

/// Rename a registry entry and rewrite history to match. Renaming a
/// type to itself is a no-op, not an error.
pub fn rename_type(
    db: &Arc<Mutex<Database>>,
    old: &str,
    new: &str,
) -> Result<SaveOutcome, AppError> {
    let new = validate_type_name(new)?;
    if old == new {
        return Ok(SaveOutcome::Unchanged);
    }

    let renamed = with_connection(db, "rename activity type", |conn| {
        ActivityType::rename(conn, old, new)
    })
    .map_err(|e| match &e {
        AppError::Database(db_err) if is_unique_violation(db_err) => {
            AppError::AlreadyExists { name: new.into() }
        }
        _ => e,
    })?;

    if renamed {
        Ok(SaveOutcome::Applied)
    } else {
        Err(AppError::NotFound { entity: "activity type" })
    }
}

/// Remove a registry entry. Activities logged under it keep their type
/// string.
pub fn delete_type(db: &Arc<Mutex<Database>>, name: &str) -> Result<(), AppError> {
    let deleted = with_connection(db, "delete activity type", |conn| {
        ActivityType::delete(conn, name)
    })?;
    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound { entity: "activity type" })
    }
}

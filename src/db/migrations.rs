use super::schema::SCHEMA;
use crate::models::ActivityType;
use rusqlite::{Connection, Result};

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    ensure_end_date_column(conn)?;
    ActivityType::synchronize(conn)?;
    Ok(())
}

/// Databases created before the end_date column existed get it added
/// in place. The column is nullable, so no backfill is needed.
fn ensure_end_date_column(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(activities)")?;
    let has_column = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|r| r.ok())
        .any(|name| name == "end_date");

    if !has_column {
        conn.execute("ALTER TABLE activities ADD COLUMN end_date TEXT", [])?;
    }
    Ok(())
}

use crate::constants::DEFAULT_ACTIVITY_TYPES;
use rusqlite::{Connection, Result, params};

/// A selectable category in the type registry.
///
/// Activities reference registry names by value only; the registry can
/// change underneath historical rows and nothing enforces the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityType {
    pub name: String,
}

impl ActivityType {
    /// Insert any canonical default name missing from the registry.
    /// Idempotent, never deletes; safe to run on every startup.
    pub fn synchronize(conn: &Connection) -> Result<()> {
        for name in DEFAULT_ACTIVITY_TYPES {
            conn.execute(
                "INSERT OR IGNORE INTO activity_types (name) VALUES (?1)",
                params![name],
            )?;
        }
        Ok(())
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT name FROM activity_types ORDER BY name")?;
        let rows = stmt.query_map([], |row| Ok(Self { name: row.get(0)? }))?;
        rows.collect()
    }

    pub fn exists(conn: &Connection, name: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activity_types WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Plain insert; a duplicate name surfaces as a UNIQUE violation.
    pub fn insert(conn: &Connection, name: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO activity_types (name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    /// Rewrite the registry entry and cascade the rename to every
    /// historical activity that carries the old name. Returns false
    /// when the registry had no such entry.
    pub fn rename(conn: &Connection, old: &str, new: &str) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE activity_types SET name = ?1 WHERE name = ?2",
            params![new, old],
        )?;
        if rows_affected == 0 {
            return Ok(false);
        }

        conn.execute(
            "UPDATE activities SET type = ?1 WHERE type = ?2",
            params![new, old],
        )?;
        Ok(true)
    }

    /// Remove the registry entry only. Historical activities keep the
    /// dangling name.
    pub fn delete(conn: &Connection, name: &str) -> Result<bool> {
        let rows_affected = conn.execute(
            "DELETE FROM activity_types WHERE name = ?1",
            params![name],
        )?;
        Ok(rows_affected > 0)
    }
}

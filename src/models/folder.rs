use rusqlite::{Connection, Result, params};

/// A flat grouping for plans. No nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: Option<i64>,
    pub name: String,
    pub created_at: i64,
}

impl Folder {
    pub fn new(name: &str, created_at: i64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            created_at,
        }
    }

    pub fn save(&mut self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO folders (name, created_at) VALUES (?1, ?2)",
            params![self.name, self.created_at],
        )?;
        self.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    pub fn rename(conn: &Connection, id: i64, name: &str) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE folders SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM folders WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM folders WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                created_at: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM folders ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Self {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        rows.collect()
    }
}

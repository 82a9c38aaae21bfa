use rusqlite::{Connection, Result, Row, params};

/// A single logged item: a movie watched, a book read, a city visited.
///
/// `date` is `YYYY-MM-DD`; legacy rows may carry `YYYY-MM`. `end_date`,
/// when present, closes a date range and is `>= date`. `rating` is 0-10
/// with 0 meaning unrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: Option<i64>,
    pub type_name: String,
    pub name: String,
    pub date: String,
    pub comment: Option<String>,
    pub rating: i32,
    pub end_date: Option<String>,
}

impl Activity {
    pub(crate) const COLUMNS: &'static str =
        "id, type, name, date, comment, rating, end_date";

    pub fn new(type_name: &str, name: &str, date: &str) -> Self {
        Self {
            id: None,
            type_name: type_name.to_string(),
            name: name.to_string(),
            date: date.to_string(),
            comment: None,
            rating: 0,
            end_date: None,
        }
    }

    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            type_name: row.get(1)?,
            name: row.get(2)?,
            date: row.get(3)?,
            comment: row.get(4)?,
            rating: row.get(5)?,
            end_date: row.get(6)?,
        })
    }

    pub fn save(&mut self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO activities (type, name, date, comment, rating, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.type_name,
                self.name,
                self.date,
                self.comment,
                self.rating,
                self.end_date,
            ],
        )?;
        self.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Full-row replace by id. Returns false when no row matched.
    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let id = self.id.ok_or_else(|| {
            rusqlite::Error::InvalidParameterName("Cannot update unsaved activity".to_string())
        })?;

        let rows_affected = conn.execute(
            "UPDATE activities
             SET type = ?1, name = ?2, date = ?3, comment = ?4, rating = ?5, end_date = ?6
             WHERE id = ?7",
            params![
                self.type_name,
                self.name,
                self.date,
                self.comment,
                self.rating,
                self.end_date,
                id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Hard delete. Returns false when no row matched the id.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM activities WHERE id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }
}

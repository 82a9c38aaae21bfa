use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row, params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanScope {
    Monthly,
    Yearly,
}

impl PlanScope {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanScope::Monthly => "monthly",
            PlanScope::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(PlanScope::Monthly),
            "yearly" => Some(PlanScope::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    Planned,
    InProgress,
    Completed,
    Archived,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Planned => "planned",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(PlanStatus::Planned),
            "in_progress" => Some(PlanStatus::InProgress),
            "completed" => Some(PlanStatus::Completed),
            "archived" => Some(PlanStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPriority {
    Low,
    Medium,
    High,
}

impl PlanPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanPriority::Low => "low",
            PlanPriority::Medium => "medium",
            PlanPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(PlanPriority::Low),
            "medium" => Some(PlanPriority::Medium),
            "high" => Some(PlanPriority::High),
            _ => None,
        }
    }
}

/// A monthly or yearly goal, independent of logged activities.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub scope: PlanScope,
    pub year: i32,
    /// 1-12 for monthly plans, None for yearly ones.
    pub month: Option<u32>,
    pub status: PlanStatus,
    pub progress: i32,
    pub priority: PlanPriority,
    pub created_at: i64,
    pub folder_id: Option<i64>,
}

impl Plan {
    const COLUMNS: &'static str =
        "id, title, description, scope, year, month, status, progress, priority, created_at, folder_id";

    pub fn new(title: &str, scope: PlanScope, year: i32, month: Option<u32>, created_at: i64) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            description: None,
            scope,
            year,
            month,
            status: PlanStatus::Planned,
            progress: 0,
            priority: PlanPriority::Medium,
            created_at,
            folder_id: None,
        }
    }

    fn from_row(row: &Row) -> Result<Self> {
        let scope_raw: String = row.get(3)?;
        let status_raw: String = row.get(6)?;
        let priority_raw: String = row.get(8)?;

        Ok(Self {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            scope: PlanScope::parse(&scope_raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    Type::Text,
                    format!("unknown plan scope '{}'", scope_raw).into(),
                )
            })?,
            year: row.get(4)?,
            month: row.get(5)?,
            status: PlanStatus::parse(&status_raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    Type::Text,
                    format!("unknown plan status '{}'", status_raw).into(),
                )
            })?,
            progress: row.get(7)?,
            priority: PlanPriority::parse(&priority_raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    8,
                    Type::Text,
                    format!("unknown plan priority '{}'", priority_raw).into(),
                )
            })?,
            created_at: row.get(9)?,
            folder_id: row.get(10)?,
        })
    }

    pub fn save(&mut self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO plans (title, description, scope, year, month, status, progress, priority, created_at, folder_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                self.title,
                self.description,
                self.scope.as_str(),
                self.year,
                self.month,
                self.status.as_str(),
                self.progress,
                self.priority.as_str(),
                self.created_at,
                self.folder_id,
            ],
        )?;
        self.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let id = self.id.ok_or_else(|| {
            rusqlite::Error::InvalidParameterName("Cannot update unsaved plan".to_string())
        })?;

        let rows_affected = conn.execute(
            "UPDATE plans
             SET title = ?1, description = ?2, scope = ?3, year = ?4, month = ?5,
                 status = ?6, progress = ?7, priority = ?8, folder_id = ?9
             WHERE id = ?10",
            params![
                self.title,
                self.description,
                self.scope.as_str(),
                self.year,
                self.month,
                self.status.as_str(),
                self.progress,
                self.priority.as_str(),
                self.folder_id,
                id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Partial update of just the progress/status pair.
    pub fn set_state(conn: &Connection, id: i64, status: PlanStatus, progress: i32) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE plans SET status = ?1, progress = ?2 WHERE id = ?3",
            params![status.as_str(), progress, id],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM plans WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM plans WHERE id = ?1", Self::COLUMNS))?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM plans ORDER BY year DESC, month DESC, created_at DESC",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::from_row)?;
        rows.collect()
    }

    /// Plans for one year; monthly plans restricted further when a month
    /// is given, yearly plans always included.
    pub fn find_for_period(conn: &Connection, year: i32, month: Option<u32>) -> Result<Vec<Self>> {
        let mut stmt;
        let rows = match month {
            Some(m) => {
                stmt = conn.prepare(&format!(
                    "SELECT {} FROM plans WHERE year = ?1 AND (month IS NULL OR month = ?2)
                     ORDER BY created_at DESC",
                    Self::COLUMNS
                ))?;
                stmt.query_map(params![year, m], Self::from_row)?
            }
            None => {
                stmt = conn.prepare(&format!(
                    "SELECT {} FROM plans WHERE year = ?1 ORDER BY month, created_at DESC",
                    Self::COLUMNS
                ))?;
                stmt.query_map(params![year], Self::from_row)?
            }
        };
        rows.collect()
    }

    pub fn find_by_folder(conn: &Connection, folder_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM plans WHERE folder_id = ?1 ORDER BY created_at DESC",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![folder_id], Self::from_row)?;
        rows.collect()
    }
}

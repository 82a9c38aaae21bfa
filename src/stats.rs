//! Grouped counts and averages for dashboards, plus the side-by-side
//! period comparison.
//!
//! Period filtering reuses the same interval-overlap condition as the
//! list view, so the dashboard and the list never disagree about which
//! activities belong to a month.

use crate::constants::DEFAULT_ACTIVITY_TYPES;
use crate::query::{PeriodToken, push_period_condition};
use rusqlite::types::ToSql;
use rusqlite::{Connection, Result, params, params_from_iter};
use std::collections::HashMap;

/// Per-type counts and average rating for one period.
///
/// Unrated rows (rating 0) are excluded from the average entirely; a
/// group with no rated rows has no average at all rather than 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStat {
    pub type_name: String,
    pub count: u32,
    pub rated_count: u32,
    pub avg_rating: Option<f64>,
}

pub fn stats_by_type(conn: &Connection, period: &PeriodToken) -> Result<Vec<TypeStat>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    push_period_condition(period, &mut conditions, &mut params);

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT type,
                COUNT(*),
                COUNT(CASE WHEN rating > 0 THEN 1 END),
                AVG(CASE WHEN rating > 0 THEN rating END)
         FROM activities{}
         GROUP BY type
         ORDER BY COUNT(*) DESC, type",
        where_clause
    );

    let params_ref: Vec<&dyn ToSql> = params.iter().map(AsRef::as_ref).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params_ref), |row| {
        Ok(TypeStat {
            type_name: row.get(0)?,
            count: row.get(1)?,
            rated_count: row.get(2)?,
            avg_rating: row.get(3)?,
        })
    })?;
    rows.collect()
}

/// Merge groups whose type names differ only in case, keeping the
/// first-seen spelling. Averages combine weighted by rated-row count,
/// so a sub-group of unrated rows cannot drag the average down.
pub fn merge_stats_case_insensitive(stats: Vec<TypeStat>) -> Vec<TypeStat> {
    let mut merged: Vec<TypeStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for stat in stats {
        let key = stat.type_name.to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                let rated_total = existing.rated_count + stat.rated_count;
                existing.avg_rating = if rated_total == 0 {
                    None
                } else {
                    let sum = existing.avg_rating.unwrap_or(0.0) * f64::from(existing.rated_count)
                        + stat.avg_rating.unwrap_or(0.0) * f64::from(stat.rated_count);
                    Some(sum / f64::from(rated_total))
                };
                existing.count += stat.count;
                existing.rated_count = rated_total;
            }
            None => {
                index.insert(key, merged.len());
                merged.push(stat);
            }
        }
    }
    merged
}

/// Matching rows projected to (type, name), for the comparison view.
pub fn comparison_data(conn: &Connection, period: &PeriodToken) -> Result<Vec<(String, String)>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    push_period_condition(period, &mut conditions, &mut params);

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT type, name FROM activities{} ORDER BY date, id",
        where_clause
    );

    let params_ref: Vec<&dyn ToSql> = params.iter().map(AsRef::as_ref).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params_ref), |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;
    rows.collect()
}

/// One canonical category's bucket in the comparison view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonBucket {
    pub category: String,
    pub names: Vec<String>,
}

/// Group (type, name) pairs into the canonical category set, in its
/// declared order. Type matching is case-insensitive; rows whose type is
/// not canonical are dropped from the comparison.
pub fn group_comparison(rows: &[(String, String)]) -> Vec<ComparisonBucket> {
    let mut buckets: Vec<ComparisonBucket> = DEFAULT_ACTIVITY_TYPES
        .iter()
        .map(|category| ComparisonBucket {
            category: (*category).to_string(),
            names: Vec::new(),
        })
        .collect();

    for (type_name, name) in rows {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.category.eq_ignore_ascii_case(type_name))
        {
            bucket.names.push(name.clone());
        }
    }
    buckets
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodGranularity {
    Month,
    Year,
}

/// Distinct periods present in the store, most recent first. Uses the
/// start date only; this is the picker's list, not a filter.
pub fn available_periods(conn: &Connection, granularity: PeriodGranularity) -> Result<Vec<String>> {
    let prefix_len = match granularity {
        PeriodGranularity::Month => 7,
        PeriodGranularity::Year => 4,
    };
    let sql = format!(
        "SELECT DISTINCT substr(date, 1, {}) FROM activities ORDER BY 1 DESC",
        prefix_len
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

fn month_count_row(row: &rusqlite::Row) -> Result<(u32, u32)> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Per-month activity counts for one year, optionally restricted to a
/// single type. Activities are counted under their start month; months
/// with no activity are absent and must be zero-filled by the consumer.
pub fn monthly_activity_counts(
    conn: &Connection,
    year: i32,
    type_filter: Option<&str>,
) -> Result<Vec<(u32, u32)>> {
    let year_prefix = format!("{:04}", year);
    let mut stmt;
    let rows = match type_filter {
        Some(type_name) => {
            stmt = conn.prepare(
                "SELECT CAST(substr(date, 6, 2) AS INTEGER), COUNT(*)
                 FROM activities
                 WHERE substr(date, 1, 4) = ?1 AND type = ?2
                 GROUP BY 1 ORDER BY 1",
            )?;
            stmt.query_map(params![year_prefix, type_name], month_count_row)?
        }
        None => {
            stmt = conn.prepare(
                "SELECT CAST(substr(date, 6, 2) AS INTEGER), COUNT(*)
                 FROM activities
                 WHERE substr(date, 1, 4) = ?1
                 GROUP BY 1 ORDER BY 1",
            )?;
            stmt.query_map(params![year_prefix], month_count_row)?
        }
    };
    rows.collect()
}

/// Expand sparse month counts to all twelve months.
pub fn zero_fill_months(rows: &[(u32, u32)]) -> [u32; 12] {
    let mut months = [0u32; 12];
    for &(month, count) in rows {
        if (1..=12).contains(&month) {
            months[(month - 1) as usize] = count;
        }
    }
    months
}

use crate::constants::CACHE_TTL_SECS;
use crate::recommend::RecommendationItem;
use rusqlite::{Connection, Result, Row, params};

/// The composite lookup key for one cached fetch:
/// (category, period, genre, locale flag). Pages live under it.
#[derive(Debug, Clone, Copy)]
pub struct CacheKey<'a> {
    pub category: &'a str,
    pub period: &'a str,
    pub genre: &'a str,
    pub is_turkish: bool,
}

/// An externally-sourced suggestion, stored with the fetch timestamp
/// that drives the 7-day TTL. Expired rows are inert until purged.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRecommendation {
    pub id: Option<i64>,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub release_date: Option<String>,
    pub content_type: Option<String>,
    pub page: u32,
    pub fetched_at: i64,
}

impl CachedRecommendation {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            external_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            rating: row.get(4)?,
            image_url: row.get(5)?,
            release_date: row.get(6)?,
            content_type: row.get(7)?,
            page: row.get(8)?,
            fetched_at: row.get(9)?,
        })
    }

    /// Upsert one fetched page under the key. A conflicting external_id
    /// is replaced wholesale, which also refreshes its fetched_at.
    pub fn put_batch(
        conn: &Connection,
        key: &CacheKey,
        page: u32,
        items: &[RecommendationItem],
        now: i64,
    ) -> Result<()> {
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO recommendation_cache
             (category, period, genre, is_turkish, external_id, title, description,
              rating, image_url, release_date, content_type, page, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;

        for item in items {
            stmt.execute(params![
                key.category,
                key.period,
                key.genre,
                key.is_turkish as i32,
                item.external_id,
                item.title,
                item.description,
                item.rating,
                item.image_url,
                item.release_date,
                item.content_type,
                page,
                now,
            ])?;
        }
        Ok(())
    }

    /// Non-expired rows for one page, in insertion order so the source
    /// ordering is preserved.
    pub fn find_valid(
        conn: &Connection,
        key: &CacheKey,
        page: u32,
        now: i64,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, external_id, title, description, rating, image_url,
                    release_date, content_type, page, fetched_at
             FROM recommendation_cache
             WHERE category = ?1 AND period = ?2 AND genre = ?3 AND is_turkish = ?4
               AND page = ?5 AND fetched_at > ?6
             ORDER BY id",
        )?;

        let rows = stmt.query_map(
            params![
                key.category,
                key.period,
                key.genre,
                key.is_turkish as i32,
                page,
                now - CACHE_TTL_SECS,
            ],
            Self::from_row,
        )?;
        rows.collect()
    }

    /// Highest non-expired page for the key; 0 when nothing is cached.
    pub fn max_valid_page(conn: &Connection, key: &CacheKey, now: i64) -> Result<u32> {
        let max: Option<u32> = conn.query_row(
            "SELECT MAX(page) FROM recommendation_cache
             WHERE category = ?1 AND period = ?2 AND genre = ?3 AND is_turkish = ?4
               AND fetched_at > ?5",
            params![
                key.category,
                key.period,
                key.genre,
                key.is_turkish as i32,
                now - CACHE_TTL_SECS,
            ],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    pub fn is_valid(conn: &Connection, key: &CacheKey, page: u32, now: i64) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recommendation_cache
             WHERE category = ?1 AND period = ?2 AND genre = ?3 AND is_turkish = ?4
               AND page = ?5 AND fetched_at > ?6",
            params![
                key.category,
                key.period,
                key.genre,
                key.is_turkish as i32,
                page,
                now - CACHE_TTL_SECS,
            ],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Delete every expired row regardless of key; returns how many went.
    pub fn purge_expired(conn: &Connection, now: i64) -> Result<usize> {
        conn.execute(
            "DELETE FROM recommendation_cache WHERE fetched_at <= ?1",
            params![now - CACHE_TTL_SECS],
        )
    }

    /// Unconditional full wipe.
    pub fn purge_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM recommendation_cache", [])?;
        Ok(())
    }
}

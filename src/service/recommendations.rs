use crate::db::{Database, with_connection};
use crate::error::AppError;
use crate::models::{CacheKey, CachedRecommendation, Setting};
use crate::recommend::RecommendationSource;
use std::sync::{Arc, Mutex};

use super::{RecommendationResponse, current_timestamp};

/// Where a page of recommendations came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Cache,
    Source,
}

const API_KEY_SETTING: &str = "recommendation_api_key";

/// Serve a page from the cache when a fresh copy exists; otherwise ask
/// the upstream source and remember what it said.
pub fn fetch_with_cache(
    db: &Arc<Mutex<Database>>,
    source: &dyn RecommendationSource,
    category: &str,
    period: &str,
    genre: Option<&str>,
    is_turkish: bool,
    page: u32,
) -> Result<(Vec<RecommendationResponse>, FetchOrigin), AppError> {
    let key = CacheKey {
        category,
        period,
        genre: genre.unwrap_or("all"),
        is_turkish,
    };
    let now = current_timestamp()?;

    let cached = with_connection(db, "read recommendation cache", |conn| {
        CachedRecommendation::find_valid(conn, &key, page, now)
    })?;
    if !cached.is_empty() {
        let items = cached.into_iter().map(RecommendationResponse::from).collect();
        return Ok((items, FetchOrigin::Cache));
    }

    let fetched = source
        .fetch(category, period, genre, page)
        .map_err(|e| AppError::Source(e.to_string()))?;

    if !fetched.is_empty() {
        with_connection(db, "store recommendations", |conn| {
            CachedRecommendation::put_batch(conn, &key, page, &fetched, now)
        })?;
    }

    let items = fetched.into_iter().map(RecommendationResponse::from).collect();
    Ok((items, FetchOrigin::Source))
}

/// Highest page already cached and still fresh for the key; 0 if none.
pub fn max_cached_page(
    db: &Arc<Mutex<Database>>,
    category: &str,
    period: &str,
    genre: Option<&str>,
    is_turkish: bool,
) -> Result<u32, AppError> {
    let key = CacheKey {
        category,
        period,
        genre: genre.unwrap_or("all"),
        is_turkish,
    };
    let now = current_timestamp()?;
    with_connection(db, "probe recommendation cache", |conn| {
        CachedRecommendation::max_valid_page(conn, &key, now)
    })
}

/// Drop everything past the TTL; returns how many rows went.
pub fn purge_expired_recommendations(db: &Arc<Mutex<Database>>) -> Result<usize, AppError> {
    let now = current_timestamp()?;
    with_connection(db, "purge expired recommendations", |conn| {
        CachedRecommendation::purge_expired(conn, now)
    })
}

pub fn clear_recommendation_cache(db: &Arc<Mutex<Database>>) -> Result<(), AppError> {
    with_connection(db, "clear recommendation cache", CachedRecommendation::purge_all)
}

pub fn get_api_key(db: &Arc<Mutex<Database>>) -> Result<Option<String>, AppError> {
    with_connection(db, "read API key", |conn| Setting::get(conn, API_KEY_SETTING))
}

pub fn set_api_key(db: &Arc<Mutex<Database>>, value: &str) -> Result<(), AppError> {
    with_connection(db, "store API key", |conn| {
        Setting::set(conn, API_KEY_SETTING, value)
    })
}

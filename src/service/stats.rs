use crate::db::{Database, with_connection};
use crate::error::AppError;
use crate::query::PeriodToken;
use crate::stats::{
    PeriodGranularity, comparison_data, group_comparison, merge_stats_case_insensitive,
    monthly_activity_counts, stats_by_type, zero_fill_months,
};
use std::sync::{Arc, Mutex};

use super::{
    ComparisonBucketResponse, ComparisonResponse, ComparisonSide, MonthlyCountsResponse,
    TypeStatResponse,
};

/// A non-empty token that fails to parse yields an empty dashboard
/// rather than falling back to all-time numbers; only an empty token
/// means all-time.
fn parse_dashboard_token(raw: &str) -> Option<PeriodToken> {
    let token = PeriodToken::parse(raw);
    if !raw.trim().is_empty() && token == PeriodToken::All {
        None
    } else {
        Some(token)
    }
}

/// Per-type counts and averages for a dashboard period. Case-variant
/// type spellings are merged before display.
pub fn overview(db: &Arc<Mutex<Database>>, raw_period: &str) -> Result<Vec<TypeStatResponse>, AppError> {
    let token = match parse_dashboard_token(raw_period) {
        Some(token) => token,
        None => return Ok(Vec::new()),
    };

    let stats = with_connection(db, "load type statistics", |conn| {
        stats_by_type(conn, &token)
    })?;
    Ok(merge_stats_case_insensitive(stats)
        .into_iter()
        .map(TypeStatResponse::from)
        .collect())
}

fn comparison_side(db: &Arc<Mutex<Database>>, raw_period: &str) -> Result<ComparisonSide, AppError> {
    let buckets = match parse_dashboard_token(raw_period) {
        Some(token) => {
            let rows = with_connection(db, "load comparison data", |conn| {
                comparison_data(conn, &token)
            })?;
            group_comparison(&rows)
        }
        None => group_comparison(&[]),
    };

    Ok(ComparisonSide {
        period: raw_period.trim().to_string(),
        buckets: buckets
            .into_iter()
            .map(|b| ComparisonBucketResponse {
                category: b.category,
                names: b.names,
            })
            .collect(),
    })
}

/// Side-by-side groupings for two arbitrary periods.
pub fn comparison(
    db: &Arc<Mutex<Database>>,
    period_a: &str,
    period_b: &str,
) -> Result<ComparisonResponse, AppError> {
    Ok(ComparisonResponse {
        left: comparison_side(db, period_a)?,
        right: comparison_side(db, period_b)?,
    })
}

/// Distinct periods available for the pickers, most recent first.
pub fn available_periods(
    db: &Arc<Mutex<Database>>,
    granularity: PeriodGranularity,
) -> Result<Vec<String>, AppError> {
    with_connection(db, "load available periods", |conn| {
        crate::stats::available_periods(conn, granularity)
    })
}

/// A year's activity histogram, zero-filled for all twelve months.
pub fn monthly_counts(
    db: &Arc<Mutex<Database>>,
    year: i32,
    type_filter: Option<&str>,
) -> Result<MonthlyCountsResponse, AppError> {
    let sparse = with_connection(db, "load monthly counts", |conn| {
        monthly_activity_counts(conn, year, type_filter)
    })?;
    Ok(MonthlyCountsResponse {
        year,
        counts: zero_fill_months(&sparse).to_vec(),
    })
}

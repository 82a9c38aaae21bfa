use crate::db::{Database, with_connection};
use crate::error::AppError;
use crate::query::{ActivityFilter, PeriodToken};
use crate::report::{ReportRenderer, ReportRow, ReportSummary};
use crate::stats::{merge_stats_case_insensitive, stats_by_type};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Everything a renderer needs for a period report: the aggregate
/// header plus the detail rows in list-view order.
pub fn build_report(
    db: &Arc<Mutex<Database>>,
    raw_period: &str,
) -> Result<(ReportSummary, Vec<ReportRow>), AppError> {
    let token = PeriodToken::parse(raw_period);

    let stats = with_connection(db, "load report statistics", |conn| {
        stats_by_type(conn, &token)
    })?;
    let by_type = merge_stats_case_insensitive(stats);
    let total = by_type.iter().map(|s| s.count).sum();

    let filter = ActivityFilter {
        period: token,
        ..Default::default()
    };
    let activities = with_connection(db, "load report rows", |conn| filter.fetch_all(conn))?;

    let rows = activities
        .into_iter()
        .map(|a| ReportRow {
            id: a.id.unwrap_or(0),
            type_name: a.type_name,
            name: a.name,
            date: a.date,
            comment: a.comment,
            rating: a.rating,
            end_date: a.end_date,
        })
        .collect();

    let summary = ReportSummary {
        period: raw_period.trim().to_string(),
        total,
        by_type,
    };
    Ok((summary, rows))
}

pub fn render_report(
    db: &Arc<Mutex<Database>>,
    renderer: &dyn ReportRenderer,
    path: &Path,
    title: &str,
    raw_period: &str,
) -> Result<(), AppError> {
    let (summary, rows) = build_report(db, raw_period)?;
    renderer.render(path, title, &summary, &rows)
}

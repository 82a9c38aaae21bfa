//! Filtered, paginated reads over the activities table.
//!
//! The WHERE clause and its parameters are built once and shared verbatim
//! by the COUNT query and the page query, so the total used for
//! pagination can never drift from the rows actually returned.

use crate::constants::DEFAULT_ITEMS_PER_PAGE;
use crate::models::Activity;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Result, params_from_iter};

/// A parsed date filter token.
///
/// Raw input that is neither empty, a 4-digit year, nor a valid `YYYY-MM`
/// month is treated as "no date filter" rather than an error, matching
/// how the list view has always behaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodToken {
    All,
    Year(String),
    Month(String),
}

impl PeriodToken {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return PeriodToken::All;
        }
        if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
            return PeriodToken::Year(raw.to_string());
        }
        if is_year_month(raw) {
            return PeriodToken::Month(raw.to_string());
        }
        log::debug!("ignoring unparseable date filter '{}'", raw);
        PeriodToken::All
    }

    /// The period string itself, for tokens that carry one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PeriodToken::All => None,
            PeriodToken::Year(s) | PeriodToken::Month(s) => Some(s),
        }
    }
}

fn is_year_month(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit)
        || !bytes[5..].iter().all(u8::is_ascii_digit)
    {
        return false;
    }
    matches!(raw[5..].parse::<u32>(), Ok(m) if (1..=12).contains(&m))
}

/// Append the interval-overlap condition for a period token.
///
/// An activity `[date, end_date]` (end_date defaulting to date) matches a
/// period when the two intervals overlap, compared at the token's
/// granularity. Zero-padded ISO strings make the comparison lexicographic,
/// and taking `substr` at the token's length also keeps legacy `YYYY-MM`
/// dates working.
pub(crate) fn push_period_condition(
    token: &PeriodToken,
    conditions: &mut Vec<String>,
    params: &mut Vec<Box<dyn ToSql>>,
) {
    let period = match token.as_str() {
        Some(p) => p,
        None => return,
    };
    let len = period.len();

    params.push(Box::new(period.to_string()));
    conditions.push(format!("substr(date, 1, {}) <= ?{}", len, params.len()));
    params.push(Box::new(period.to_string()));
    conditions.push(format!(
        "substr(coalesce(end_date, date), 1, {}) >= ?{}",
        len,
        params.len()
    ));
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Filters for the activity list view.
#[derive(Debug, Clone)]
pub struct ActivityFilter {
    /// None means all types.
    pub type_filter: Option<String>,
    /// Case-insensitive substring match against the name.
    pub search: Option<String>,
    pub period: PeriodToken,
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            type_filter: None,
            search: None,
            period: PeriodToken::All,
            page: 1,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ActivityFilter {
    fn build_where(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref type_name) = self.type_filter {
            params.push(Box::new(type_name.clone()));
            conditions.push(format!("type = ?{}", params.len()));
        }

        if let Some(ref term) = self.search {
            if !term.is_empty() {
                params.push(Box::new(format!("%{}%", escape_like(term))));
                conditions.push(format!("name LIKE ?{} ESCAPE '\\'", params.len()));
            }
        }

        push_period_condition(&self.period, &mut conditions, &mut params);

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        (where_clause, params)
    }

    /// One page of matching activities plus the authoritative total count.
    pub fn fetch_page(&self, conn: &Connection) -> Result<(Vec<Activity>, u32)> {
        let (where_clause, params) = self.build_where();
        let params_ref: Vec<&dyn ToSql> = params.iter().map(AsRef::as_ref).collect();

        let total: u32 = conn.query_row(
            &format!("SELECT COUNT(*) FROM activities{}", where_clause),
            params_from_iter(params_ref.iter().copied()),
            |row| row.get(0),
        )?;

        let offset = (self.page.max(1) - 1) * self.per_page;
        let sql = format!(
            "SELECT {} FROM activities{} ORDER BY date DESC, id DESC LIMIT {} OFFSET {}",
            Activity::COLUMNS, where_clause, self.per_page, offset
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params_ref), Activity::from_row)?;
        let activities = rows.collect::<Result<Vec<_>>>()?;

        Ok((activities, total))
    }

    /// All matching activities, list-view order, no pagination. Used for
    /// exports and reports.
    pub fn fetch_all(&self, conn: &Connection) -> Result<Vec<Activity>> {
        let (where_clause, params) = self.build_where();
        let params_ref: Vec<&dyn ToSql> = params.iter().map(AsRef::as_ref).collect();

        let sql = format!(
            "SELECT {} FROM activities{} ORDER BY date DESC, id DESC",
            Activity::COLUMNS, where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params_ref), Activity::from_row)?;
        rows.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use rusqlite::Connection;
    use std::collections::HashSet;

    fn add(conn: &Connection, type_name: &str, name: &str, date: &str) -> i64 {
        let mut a = Activity::new(type_name, name, date);
        a.save(conn).unwrap();
        a.id.unwrap()
    }

    fn add_ranged(conn: &Connection, type_name: &str, name: &str, date: &str, end: &str) -> i64 {
        let mut a = Activity::new(type_name, name, date);
        a.end_date = Some(end.to_string());
        a.save(conn).unwrap();
        a.id.unwrap()
    }

    #[test]
    fn test_period_token_parse() {
        assert_eq!(PeriodToken::parse(""), PeriodToken::All);
        assert_eq!(PeriodToken::parse("  "), PeriodToken::All);
        assert_eq!(PeriodToken::parse("2023"), PeriodToken::Year("2023".to_string()));
        assert_eq!(PeriodToken::parse("2023-01"), PeriodToken::Month("2023-01".to_string()));

        // Garbage degrades to no filter instead of erroring.
        assert_eq!(PeriodToken::parse("20x3"), PeriodToken::All);
        assert_eq!(PeriodToken::parse("2023-13"), PeriodToken::All);
        assert_eq!(PeriodToken::parse("2023-1"), PeriodToken::All);
        assert_eq!(PeriodToken::parse("2023-01-15"), PeriodToken::All);
    }

    #[test]
    fn test_month_filter_uses_range_overlap() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let a1 = add(conn, "Movie", "January only", "2023-01-10");
        let a2 = add_ranged(conn, "TV Series", "Spans into February", "2023-01-20", "2023-02-05");
        let a3 = add(conn, "Movie", "March", "2023-03-01");

        let filter = ActivityFilter {
            period: PeriodToken::parse("2023-01"),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        let ids: HashSet<i64> = items.iter().map(|a| a.id.unwrap()).collect();
        assert_eq!(total, 2);
        assert!(ids.contains(&a1) && ids.contains(&a2));

        // The range spanning into February shows up under February too.
        let filter = ActivityFilter {
            period: PeriodToken::parse("2023-02"),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, Some(a2));

        let filter = ActivityFilter {
            period: PeriodToken::parse("2023-03"),
            ..Default::default()
        };
        let (items, _) = filter.fetch_page(conn).unwrap();
        assert_eq!(items[0].id, Some(a3));
    }

    #[test]
    fn test_year_filter_matches_prefix_and_spans() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        add(conn, "Movie", "Old", "2022-06-01");
        add(conn, "Movie", "New", "2023-06-01");
        let spanning = add_ranged(conn, "City", "New year trip", "2022-12-28", "2023-01-02");

        let filter = ActivityFilter {
            period: PeriodToken::parse("2023"),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().any(|a| a.id == Some(spanning)));

        let filter = ActivityFilter {
            period: PeriodToken::parse("2022"),
            ..Default::default()
        };
        let (_, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_legacy_month_granularity_dates_match() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let legacy = add(conn, "Book", "Legacy row", "2019-07");

        let filter = ActivityFilter {
            period: PeriodToken::parse("2019-07"),
            ..Default::default()
        };
        let (items, _) = filter.fetch_page(conn).unwrap();
        assert_eq!(items[0].id, Some(legacy));

        let filter = ActivityFilter {
            period: PeriodToken::parse("2019"),
            ..Default::default()
        };
        let (_, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_invalid_date_token_means_no_date_filter() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        add(conn, "Movie", "A", "2022-06-01");
        add(conn, "Movie", "B", "2023-06-01");

        let filter = ActivityFilter {
            period: PeriodToken::parse("not-a-date"),
            ..Default::default()
        };
        let (_, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let hit = add(conn, "Movie", "The GODFATHER", "2023-01-01");
        add(conn, "Movie", "Heat", "2023-01-02");

        let filter = ActivityFilter {
            search: Some("godfather".to_string()),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, Some(hit));
    }

    #[test]
    fn test_search_escapes_like_wildcards() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let literal = add(conn, "Course", "100% Rust", "2023-02-01");
        add(conn, "Course", "1000 Leagues", "2023-02-02");

        let filter = ActivityFilter {
            search: Some("100%".to_string()),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, Some(literal));
    }

    #[test]
    fn test_type_and_search_and_period_combine() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let hit = add(conn, "Book", "Dune", "2023-04-10");
        add(conn, "Movie", "Dune", "2023-04-11");
        add(conn, "Book", "Dune Messiah", "2022-04-10");

        let filter = ActivityFilter {
            type_filter: Some("Book".to_string()),
            search: Some("dune".to_string()),
            period: PeriodToken::parse("2023"),
            ..Default::default()
        };
        let (items, total) = filter.fetch_page(conn).unwrap();
        assert_eq!(total, 1, "the Movie and the 2022 Book are both filtered out");
        assert_eq!(items[0].id, Some(hit));
    }

    #[test]
    fn test_pagination_partitions_all_rows_in_order() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        // Duplicate dates force the id tie-break.
        let dates = [
            "2023-01-05", "2023-01-05", "2023-02-10", "2023-02-10",
            "2023-03-15", "2023-04-20", "2023-05-25",
        ];
        for (i, date) in dates.iter().enumerate() {
            add(conn, "Movie", &format!("movie {}", i), date);
        }

        let per_page = 3;
        let probe = ActivityFilter { per_page, ..Default::default() };
        let (_, total) = probe.fetch_page(conn).unwrap();
        assert_eq!(total, dates.len() as u32);

        let page_count = total.div_ceil(per_page);
        let mut seen: Vec<(String, i64)> = Vec::new();
        let mut sum = 0;
        for page in 1..=page_count {
            let filter = ActivityFilter { page, per_page, ..Default::default() };
            let (items, page_total) = filter.fetch_page(conn).unwrap();
            assert_eq!(page_total, total, "count is stable across pages");
            sum += items.len();
            seen.extend(items.iter().map(|a| (a.date.clone(), a.id.unwrap())));
        }

        assert_eq!(sum as u32, total, "pages partition the result set");

        let unique: HashSet<i64> = seen.iter().map(|(_, id)| *id).collect();
        assert_eq!(unique.len(), seen.len(), "every id appears exactly once");

        // date DESC, id DESC across page boundaries.
        for pair in seen.windows(2) {
            let (ref d1, id1) = pair[0];
            let (ref d2, id2) = pair[1];
            assert!(d1 > d2 || (d1 == d2 && id1 > id2), "ordering violated: {:?}", pair);
        }

        // Page past the end is empty but still reports the total.
        let filter = ActivityFilter { page: page_count + 1, per_page, ..Default::default() };
        let (items, page_total) = filter.fetch_page(conn).unwrap();
        assert!(items.is_empty());
        assert_eq!(page_total, total);
    }

    #[test]
    fn test_fetch_all_matches_list_order() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        add(conn, "Movie", "first", "2023-01-01");
        add(conn, "Movie", "second", "2023-06-01");

        let all = ActivityFilter::default().fetch_all(conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "second");
        assert_eq!(all[1].name, "first");
    }
}

use crate::constants::*;
use crate::error::AppError;

/// Granularities accepted for an activity's start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    Day,
    /// Legacy rows logged before day precision existed.
    Month,
}

/// Validate an activity name. Returns the trimmed name.
pub fn validate_activity_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput {
            field: "name",
            reason: "cannot be empty".into(),
        });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput {
            field: "name",
            reason: format!("cannot exceed {} characters", MAX_NAME_LEN),
        });
    }
    Ok(name)
}

/// Validate a type registry name. Returns the trimmed name.
pub fn validate_type_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput {
            field: "type",
            reason: "cannot be empty".into(),
        });
    }
    if name.len() > MAX_TYPE_NAME_LEN {
        return Err(AppError::InvalidInput {
            field: "type",
            reason: format!("cannot exceed {} characters", MAX_TYPE_NAME_LEN),
        });
    }
    Ok(name)
}

/// Validate an activity date: `YYYY-MM-DD`, or legacy `YYYY-MM`.
pub fn validate_date(date: &str) -> Result<DateGranularity, AppError> {
    let err = |reason: &str| AppError::InvalidInput {
        field: "date",
        reason: reason.into(),
    };

    let bytes = date.as_bytes();
    match bytes.len() {
        7 => {
            parse_year_month(date).ok_or_else(|| err("must be in YYYY-MM-DD format"))?;
            Ok(DateGranularity::Month)
        }
        10 => {
            if bytes[7] != b'-' {
                return Err(err("must be in YYYY-MM-DD format"));
            }
            let (year, month) =
                parse_year_month(&date[..7]).ok_or_else(|| err("must be in YYYY-MM-DD format"))?;
            let day: u32 = date[8..10]
                .parse()
                .map_err(|_| err("must be in YYYY-MM-DD format"))?;
            if day < 1 || day > days_in_month(year, month) {
                return Err(err("day is out of range for that month"));
            }
            Ok(DateGranularity::Day)
        }
        _ => Err(err("must be in YYYY-MM-DD format")),
    }
}

/// Validate an end date against its start. End dates are always day
/// precision and must not precede the start; both strings are
/// zero-padded so plain string comparison is the date comparison.
pub fn validate_end_date(start: &str, end: &str) -> Result<(), AppError> {
    if validate_date(end)? != DateGranularity::Day {
        return Err(AppError::InvalidInput {
            field: "end date",
            reason: "must be in YYYY-MM-DD format".into(),
        });
    }
    if end < start {
        return Err(AppError::InvalidInput {
            field: "end date",
            reason: "cannot be before the start date".into(),
        });
    }
    Ok(())
}

/// Validate a rating (0 = unrated).
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(0..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput {
            field: "rating",
            reason: format!("must be 0-{}", MAX_RATING),
        });
    }
    Ok(())
}

/// Validate a plan title. Returns the trimmed title.
pub fn validate_plan_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput {
            field: "title",
            reason: "cannot be empty".into(),
        });
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput {
            field: "title",
            reason: format!("cannot exceed {} characters", MAX_TITLE_LEN),
        });
    }
    Ok(title)
}

/// Validate plan progress (percent).
pub fn validate_progress(progress: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&progress) {
        return Err(AppError::InvalidInput {
            field: "progress",
            reason: "must be 0-100".into(),
        });
    }
    Ok(())
}

/// Validate a month number for monthly plans.
pub fn validate_month(month: u32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidInput {
            field: "month",
            reason: "must be 1-12".into(),
        });
    }
    Ok(())
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let bytes = s.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return None;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..7].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let year: i32 = s[..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_activity_name_trims() {
        assert_eq!(validate_activity_name("  Dune  ").unwrap(), "Dune");
        assert!(validate_activity_name("").is_err());
        assert!(validate_activity_name("   ").is_err());
        assert!(validate_activity_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_date_day_granularity() {
        assert_eq!(validate_date("2023-01-15").unwrap(), DateGranularity::Day);
        assert_eq!(validate_date("2024-02-29").unwrap(), DateGranularity::Day);
    }

    #[test]
    fn test_validate_date_legacy_month_granularity() {
        assert_eq!(validate_date("2019-07").unwrap(), DateGranularity::Month);
    }

    #[test]
    fn test_validate_date_rejects_malformed() {
        assert!(validate_date("").is_err());
        assert!(validate_date("2023").is_err());
        assert!(validate_date("2023-13-01").is_err());
        assert!(validate_date("2023-00").is_err());
        assert!(validate_date("2023-02-30").is_err());
        assert!(validate_date("2023-02-29").is_err()); // not a leap year
        assert!(validate_date("2023/01/15").is_err());
        assert!(validate_date("15-01-2023").is_err());
    }

    #[test]
    fn test_validate_end_date() {
        assert!(validate_end_date("2023-01-10", "2023-01-10").is_ok());
        assert!(validate_end_date("2023-01-10", "2023-02-05").is_ok());
        assert!(validate_end_date("2023-01-10", "2023-01-09").is_err());
        // End dates never use the legacy month granularity.
        assert!(validate_end_date("2023-01-10", "2023-02").is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(0).is_ok());
        assert!(validate_rating(10).is_ok());
        assert!(validate_rating(-1).is_err());
        assert!(validate_rating(11).is_err());
    }

    #[test]
    fn test_validate_progress_and_month() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(100).is_ok());
        assert!(validate_progress(101).is_err());
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }
}

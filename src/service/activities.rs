use crate::db::{Database, with_connection};
use crate::error::AppError;
use crate::models::Activity;
use crate::query::ActivityFilter;
use crate::validation::{validate_activity_name, validate_date, validate_end_date, validate_rating, validate_type_name};
use std::sync::{Arc, Mutex};

use super::{ActivityInput, ActivityPage, ActivityResponse, SaveOutcome};

/// Validate an input payload and turn it into an unsaved row.
fn build_activity(input: &ActivityInput) -> Result<Activity, AppError> {
    let type_name = validate_type_name(&input.type_name)?;
    let name = validate_activity_name(&input.name)?;
    validate_date(&input.date)?;
    if let Some(ref end_date) = input.end_date {
        validate_end_date(&input.date, end_date)?;
    }
    let rating = input.rating.unwrap_or(0);
    validate_rating(rating)?;

    let mut activity = Activity::new(type_name, name, &input.date);
    activity.comment = input.comment.clone().filter(|c| !c.trim().is_empty());
    activity.rating = rating;
    activity.end_date = input.end_date.clone();
    Ok(activity)
}

pub fn add_activity(
    db: &Arc<Mutex<Database>>,
    input: &ActivityInput,
) -> Result<ActivityResponse, AppError> {
    let mut activity = build_activity(input)?;
    with_connection(db, "add activity", |conn| activity.save(conn))?;
    Ok(ActivityResponse::from(activity))
}

/// Full-replace update with a no-op guard: a payload identical to the
/// stored row short-circuits with `Unchanged` and never issues a write.
pub fn update_activity(
    db: &Arc<Mutex<Database>>,
    id: i64,
    input: &ActivityInput,
) -> Result<SaveOutcome, AppError> {
    let mut candidate = build_activity(input)?;
    candidate.id = Some(id);

    let existing = with_connection(db, "load activity", |conn| Activity::find_by_id(conn, id))?
        .ok_or(AppError::NotFound { entity: "activity" })?;

    if candidate == existing {
        return Ok(SaveOutcome::Unchanged);
    }

    let updated = with_connection(db, "update activity", |conn| candidate.update(conn))?;
    if updated {
        Ok(SaveOutcome::Applied)
    } else {
        Err(AppError::NotFound { entity: "activity" })
    }
}

/// Hard delete. Deleting an id that matches nothing is reported as
/// `NotFound` rather than silent success.
pub fn delete_activity(db: &Arc<Mutex<Database>>, id: i64) -> Result<(), AppError> {
    let deleted = with_connection(db, "delete activity", |conn| Activity::delete(conn, id))?;
    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound { entity: "activity" })
    }
}

pub fn get_activity(db: &Arc<Mutex<Database>>, id: i64) -> Result<ActivityResponse, AppError> {
    let activity = with_connection(db, "load activity", |conn| Activity::find_by_id(conn, id))?
        .ok_or(AppError::NotFound { entity: "activity" })?;
    Ok(ActivityResponse::from(activity))
}

pub fn list_activities(
    db: &Arc<Mutex<Database>>,
    filter: &ActivityFilter,
) -> Result<ActivityPage, AppError> {
    let (items, total_count) =
        with_connection(db, "list activities", |conn| filter.fetch_page(conn))?;
    Ok(ActivityPage {
        items: items.into_iter().map(ActivityResponse::from).collect(),
        total_count,
        page: filter.page,
        per_page: filter.per_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_shared_db;

    fn input(name: &str, date: &str) -> ActivityInput {
        ActivityInput {
            type_name: "Movie".to_string(),
            name: name.to_string(),
            date: date.to_string(),
            comment: None,
            rating: Some(7),
            end_date: None,
        }
    }

    #[test]
    fn test_add_then_get_round_trip() {
        let (db, _dir) = setup_shared_db();

        let created = add_activity(&db, &input("Alien", "2023-10-31")).unwrap();
        let fetched = get_activity(&db, created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.rating, 7);
    }

    #[test]
    fn test_add_trims_name_and_validates() {
        let (db, _dir) = setup_shared_db();

        let mut bad = input("  ", "2023-10-31");
        assert!(matches!(
            add_activity(&db, &bad),
            Err(AppError::InvalidInput { field: "name", .. })
        ));

        bad = input("Alien", "31/10/2023");
        assert!(matches!(
            add_activity(&db, &bad),
            Err(AppError::InvalidInput { field: "date", .. })
        ));

        bad = input("Alien", "2023-10-31");
        bad.rating = Some(11);
        assert!(matches!(
            add_activity(&db, &bad),
            Err(AppError::InvalidInput { field: "rating", .. })
        ));

        bad = input("Alien", "2023-10-31");
        bad.end_date = Some("2023-10-01".to_string());
        assert!(matches!(
            add_activity(&db, &bad),
            Err(AppError::InvalidInput { field: "end date", .. })
        ));

        let trimmed = add_activity(&db, &input("  Alien  ", "2023-10-31")).unwrap();
        assert_eq!(trimmed.name, "Alien");
    }

    #[test]
    fn test_unselected_rating_stores_zero() {
        let (db, _dir) = setup_shared_db();

        let mut no_rating = input("Stalker", "2023-06-01");
        no_rating.rating = None;
        let created = add_activity(&db, &no_rating).unwrap();
        assert_eq!(created.rating, 0);
    }

    #[test]
    fn test_update_identical_payload_is_unchanged() {
        let (db, _dir) = setup_shared_db();

        let created = add_activity(&db, &input("Solaris", "2023-08-15")).unwrap();

        let outcome = update_activity(&db, created.id, &input("Solaris", "2023-08-15")).unwrap();
        assert_eq!(outcome, SaveOutcome::Unchanged);

        let mut changed = input("Solaris", "2023-08-15");
        changed.rating = Some(9);
        let outcome = update_activity(&db, created.id, &changed).unwrap();
        assert_eq!(outcome, SaveOutcome::Applied);
        assert_eq!(get_activity(&db, created.id).unwrap().rating, 9);
    }

    #[test]
    fn test_update_missing_activity_is_not_found() {
        let (db, _dir) = setup_shared_db();
        assert!(matches!(
            update_activity(&db, 9999, &input("Ghost", "2023-01-01")),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_missing_activity_is_not_found() {
        let (db, _dir) = setup_shared_db();

        let created = add_activity(&db, &input("Heat", "2023-02-01")).unwrap();
        delete_activity(&db, created.id).unwrap();
        assert!(matches!(
            delete_activity(&db, created.id),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_wraps_filter_results() {
        let (db, _dir) = setup_shared_db();

        add_activity(&db, &input("A", "2023-01-01")).unwrap();
        add_activity(&db, &input("B", "2023-02-01")).unwrap();

        let page = list_activities(&db, &ActivityFilter::default()).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].name, "B");
    }
}

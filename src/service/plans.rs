use crate::db::{Database, with_connection};
use crate::error::AppError;
use crate::models::{Folder, Plan, PlanPriority, PlanScope, PlanStatus};
use crate::validation::{validate_activity_name, validate_month, validate_plan_title, validate_progress};
use std::sync::{Arc, Mutex};

use super::{FolderResponse, PlanInput, PlanResponse, PlanUpdate, SaveOutcome, current_timestamp};

fn parse_scope(raw: &str) -> Result<PlanScope, AppError> {
    PlanScope::parse(raw).ok_or_else(|| AppError::InvalidInput {
        field: "scope",
        reason: format!("must be 'monthly' or 'yearly', got '{}'", raw),
    })
}

fn parse_status(raw: &str) -> Result<PlanStatus, AppError> {
    PlanStatus::parse(raw).ok_or_else(|| AppError::InvalidInput {
        field: "status",
        reason: format!("unknown status '{}'", raw),
    })
}

fn parse_priority(raw: &str) -> Result<PlanPriority, AppError> {
    PlanPriority::parse(raw).ok_or_else(|| AppError::InvalidInput {
        field: "priority",
        reason: format!("must be 'low', 'medium' or 'high', got '{}'", raw),
    })
}

/// The scope decides whether a month belongs on the plan at all.
fn resolve_month(scope: PlanScope, month: Option<u32>) -> Result<Option<u32>, AppError> {
    match scope {
        PlanScope::Monthly => {
            let month = month.ok_or(AppError::InvalidInput {
                field: "month",
                reason: "monthly plans need a month".into(),
            })?;
            validate_month(month)?;
            Ok(Some(month))
        }
        PlanScope::Yearly => Ok(None),
    }
}

/// Keep progress and status coherent at the edit boundary: full progress
/// means completed and completed means full progress. Archived plans are
/// terminal and keep whatever progress they had.
fn normalize_plan_state(status: PlanStatus, progress: i32) -> (PlanStatus, i32) {
    if status == PlanStatus::Archived {
        return (PlanStatus::Archived, progress);
    }
    if progress >= 100 || status == PlanStatus::Completed {
        return (PlanStatus::Completed, 100);
    }
    (status, progress)
}

pub fn create_plan(db: &Arc<Mutex<Database>>, input: &PlanInput) -> Result<PlanResponse, AppError> {
    let title = validate_plan_title(&input.title)?;
    let scope = parse_scope(&input.scope)?;
    let month = resolve_month(scope, input.month)?;
    let priority = match input.priority.as_deref() {
        Some(raw) => parse_priority(raw)?,
        None => PlanPriority::Medium,
    };

    let mut plan = Plan::new(title, scope, input.year, month, current_timestamp()?);
    plan.description = input.description.clone();
    plan.priority = priority;
    plan.folder_id = input.folder_id;

    with_connection(db, "create plan", |conn| plan.save(conn))?;
    Ok(PlanResponse::from(plan))
}

pub fn update_plan(
    db: &Arc<Mutex<Database>>,
    id: i64,
    input: &PlanUpdate,
) -> Result<SaveOutcome, AppError> {
    let title = validate_plan_title(&input.title)?;
    let scope = parse_scope(&input.scope)?;
    let month = resolve_month(scope, input.month)?;
    validate_progress(input.progress)?;
    let (status, progress) = normalize_plan_state(parse_status(&input.status)?, input.progress);

    let existing = with_connection(db, "load plan", |conn| Plan::find_by_id(conn, id))?
        .ok_or(AppError::NotFound { entity: "plan" })?;

    let candidate = Plan {
        id: Some(id),
        title: title.to_string(),
        description: input.description.clone(),
        scope,
        year: input.year,
        month,
        status,
        progress,
        priority: parse_priority(&input.priority)?,
        created_at: existing.created_at,
        folder_id: input.folder_id,
    };

    if candidate == existing {
        return Ok(SaveOutcome::Unchanged);
    }

    let updated = with_connection(db, "update plan", |conn| candidate.update(conn))?;
    if updated {
        Ok(SaveOutcome::Applied)
    } else {
        Err(AppError::NotFound { entity: "plan" })
    }
}

/// Partial update: move the progress slider, let the status follow.
/// Winding a completed plan back down reopens it as in-progress.
pub fn set_plan_progress(
    db: &Arc<Mutex<Database>>,
    id: i64,
    progress: i32,
) -> Result<PlanResponse, AppError> {
    validate_progress(progress)?;

    let mut plan = with_connection(db, "load plan", |conn| Plan::find_by_id(conn, id))?
        .ok_or(AppError::NotFound { entity: "plan" })?;

    let base_status = if plan.status == PlanStatus::Completed && progress < 100 {
        PlanStatus::InProgress
    } else {
        plan.status
    };
    let (status, progress) = normalize_plan_state(base_status, progress);

    let updated = with_connection(db, "update plan progress", |conn| {
        Plan::set_state(conn, id, status, progress)
    })?;
    if !updated {
        return Err(AppError::NotFound { entity: "plan" });
    }
    plan.status = status;
    plan.progress = progress;
    Ok(PlanResponse::from(plan))
}

/// Partial update: change the status, let the progress follow.
pub fn set_plan_status(
    db: &Arc<Mutex<Database>>,
    id: i64,
    status: &str,
) -> Result<PlanResponse, AppError> {
    let status = parse_status(status)?;

    let mut plan = with_connection(db, "load plan", |conn| Plan::find_by_id(conn, id))?
        .ok_or(AppError::NotFound { entity: "plan" })?;

    let (status, progress) = normalize_plan_state(status, plan.progress);

    let updated = with_connection(db, "update plan status", |conn| {
        Plan::set_state(conn, id, status, progress)
    })?;
    if !updated {
        return Err(AppError::NotFound { entity: "plan" });
    }
    plan.status = status;
    plan.progress = progress;
    Ok(PlanResponse::from(plan))
}

pub fn delete_plan(db: &Arc<Mutex<Database>>, id: i64) -> Result<(), AppError> {
    let deleted = with_connection(db, "delete plan", |conn| Plan::delete(conn, id))?;
    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound { entity: "plan" })
    }
}

pub fn list_plans(db: &Arc<Mutex<Database>>) -> Result<Vec<PlanResponse>, AppError> {
    let plans = with_connection(db, "list plans", Plan::find_all)?;
    Ok(plans.into_iter().map(PlanResponse::from).collect())
}

pub fn plans_for_period(
    db: &Arc<Mutex<Database>>,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<PlanResponse>, AppError> {
    if let Some(m) = month {
        validate_month(m)?;
    }
    let plans = with_connection(db, "list plans for period", |conn| {
        Plan::find_for_period(conn, year, month)
    })?;
    Ok(plans.into_iter().map(PlanResponse::from).collect())
}

pub fn create_folder(db: &Arc<Mutex<Database>>, name: &str) -> Result<FolderResponse, AppError> {
    let name = validate_activity_name(name)?;
    let mut folder = Folder::new(name, current_timestamp()?);
    with_connection(db, "create folder", |conn| folder.save(conn))?;
    Ok(FolderResponse::from(folder))
}

pub fn rename_folder(db: &Arc<Mutex<Database>>, id: i64, name: &str) -> Result<(), AppError> {
    let name = validate_activity_name(name)?;
    let renamed = with_connection(db, "rename folder", |conn| Folder::rename(conn, id, name))?;
    if renamed {
        Ok(())
    } else {
        Err(AppError::NotFound { entity: "folder" })
    }
}

pub fn delete_folder(db: &Arc<Mutex<Database>>, id: i64) -> Result<(), AppError> {
    let deleted = with_connection(db, "delete folder", |conn| Folder::delete(conn, id))?;
    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound { entity: "folder" })
    }
}

pub fn list_folders(db: &Arc<Mutex<Database>>) -> Result<Vec<FolderResponse>, AppError> {
    let folders = with_connection(db, "list folders", Folder::find_all)?;
    Ok(folders.into_iter().map(FolderResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_shared_db;

    fn monthly_input(title: &str, month: u32) -> PlanInput {
        PlanInput {
            title: title.to_string(),
            description: None,
            scope: "monthly".to_string(),
            year: 2024,
            month: Some(month),
            priority: None,
            folder_id: None,
        }
    }

    #[test]
    fn test_create_plan_starts_planned() {
        let (db, _dir) = setup_shared_db();

        let plan = create_plan(&db, &monthly_input("Read two books", 3)).unwrap();
        assert_eq!(plan.status, "planned");
        assert_eq!(plan.progress, 0);
        assert_eq!(plan.priority, "medium");
    }

    #[test]
    fn test_create_plan_validation() {
        let (db, _dir) = setup_shared_db();

        let mut bad = monthly_input("  ", 3);
        assert!(matches!(create_plan(&db, &bad), Err(AppError::InvalidInput { field: "title", .. })));

        bad = monthly_input("ok", 13);
        assert!(matches!(create_plan(&db, &bad), Err(AppError::InvalidInput { field: "month", .. })));

        bad = monthly_input("ok", 3);
        bad.month = None;
        assert!(matches!(create_plan(&db, &bad), Err(AppError::InvalidInput { field: "month", .. })));

        bad = monthly_input("ok", 3);
        bad.scope = "weekly".to_string();
        assert!(matches!(create_plan(&db, &bad), Err(AppError::InvalidInput { field: "scope", .. })));
    }

    #[test]
    fn test_yearly_plan_drops_month() {
        let (db, _dir) = setup_shared_db();

        let mut input = monthly_input("Year of cinema", 3);
        input.scope = "yearly".to_string();
        let plan = create_plan(&db, &input).unwrap();
        assert_eq!(plan.month, None);
    }

    #[test]
    fn test_full_progress_completes_plan() {
        let (db, _dir) = setup_shared_db();

        let plan = create_plan(&db, &monthly_input("Finish course", 5)).unwrap();
        let updated = set_plan_progress(&db, plan.id, 100).unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.progress, 100);
    }

    #[test]
    fn test_completing_status_fills_progress() {
        let (db, _dir) = setup_shared_db();

        let plan = create_plan(&db, &monthly_input("Finish course", 5)).unwrap();
        let updated = set_plan_status(&db, plan.id, "completed").unwrap();
        assert_eq!(updated.progress, 100);
    }

    #[test]
    fn test_winding_back_progress_reopens_plan() {
        let (db, _dir) = setup_shared_db();

        let plan = create_plan(&db, &monthly_input("Finish course", 5)).unwrap();
        set_plan_progress(&db, plan.id, 100).unwrap();

        let reopened = set_plan_progress(&db, plan.id, 60).unwrap();
        assert_eq!(reopened.status, "in_progress");
        assert_eq!(reopened.progress, 60);
    }

    #[test]
    fn test_update_plan_no_op_detection() {
        let (db, _dir) = setup_shared_db();

        let plan = create_plan(&db, &monthly_input("Stable", 2)).unwrap();
        let same = PlanUpdate {
            title: "Stable".to_string(),
            description: None,
            scope: "monthly".to_string(),
            year: 2024,
            month: Some(2),
            status: "planned".to_string(),
            progress: 0,
            priority: "medium".to_string(),
            folder_id: None,
        };

        assert_eq!(update_plan(&db, plan.id, &same).unwrap(), SaveOutcome::Unchanged);

        let mut changed = same.clone();
        changed.progress = 30;
        changed.status = "in_progress".to_string();
        assert_eq!(update_plan(&db, plan.id, &changed).unwrap(), SaveOutcome::Applied);
    }

    #[test]
    fn test_folder_crud_and_missing_ids() {
        let (db, _dir) = setup_shared_db();

        let folder = create_folder(&db, "2024 goals").unwrap();
        rename_folder(&db, folder.id, "2024 reading goals").unwrap();

        let folders = list_folders(&db).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "2024 reading goals");

        delete_folder(&db, folder.id).unwrap();
        assert!(matches!(delete_folder(&db, folder.id), Err(AppError::NotFound { .. })));
        assert!(matches!(rename_folder(&db, folder.id, "x"), Err(AppError::NotFound { .. })));
    }
}

use crate::models::{Activity, CachedRecommendation, Folder, Plan};
use crate::recommend::RecommendationItem;
use crate::stats::TypeStat;
use serde::{Deserialize, Serialize};

/// Outcome of a mutating call that may find nothing to do.
///
/// `Unchanged` is not an error: the caller asked for a state the store
/// was already in (identical update payload, rename to the same name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Applied,
    Unchanged,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityInput {
    pub type_name: String,
    pub name: String,
    pub date: String,
    pub comment: Option<String>,
    /// None means the rating picker was left untouched (stored as 0).
    pub rating: Option<i32>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityResponse {
    pub id: i64,
    pub type_name: String,
    pub name: String,
    pub date: String,
    pub comment: Option<String>,
    pub rating: i32,
    pub end_date: Option<String>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id.unwrap_or(0),
            type_name: activity.type_name,
            name: activity.name,
            date: activity.date,
            comment: activity.comment,
            rating: activity.rating,
            end_date: activity.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub items: Vec<ActivityResponse>,
    pub total_count: u32,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub title: String,
    pub description: Option<String>,
    pub scope: String,
    pub year: i32,
    pub month: Option<u32>,
    pub priority: Option<String>,
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanUpdate {
    pub title: String,
    pub description: Option<String>,
    pub scope: String,
    pub year: i32,
    pub month: Option<u32>,
    pub status: String,
    pub progress: i32,
    pub priority: String,
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub scope: String,
    pub year: i32,
    pub month: Option<u32>,
    pub status: String,
    pub progress: i32,
    pub priority: String,
    pub created_at: i64,
    pub folder_id: Option<i64>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.unwrap_or(0),
            title: plan.title,
            description: plan.description,
            scope: plan.scope.as_str().to_string(),
            year: plan.year,
            month: plan.month,
            status: plan.status.as_str().to_string(),
            progress: plan.progress,
            priority: plan.priority.as_str().to_string(),
            created_at: plan.created_at,
            folder_id: plan.folder_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderResponse {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id.unwrap_or(0),
            name: folder.name,
            created_at: folder.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub release_date: Option<String>,
    pub content_type: Option<String>,
}

impl From<CachedRecommendation> for RecommendationResponse {
    fn from(cached: CachedRecommendation) -> Self {
        Self {
            external_id: cached.external_id,
            title: cached.title,
            description: cached.description,
            rating: cached.rating,
            image_url: cached.image_url,
            release_date: cached.release_date,
            content_type: cached.content_type,
        }
    }
}

impl From<RecommendationItem> for RecommendationResponse {
    fn from(item: RecommendationItem) -> Self {
        Self {
            external_id: item.external_id,
            title: item.title,
            description: item.description,
            rating: item.rating,
            image_url: item.image_url,
            release_date: item.release_date,
            content_type: item.content_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeStatResponse {
    pub type_name: String,
    pub count: u32,
    pub avg_rating: Option<f64>,
}

impl From<TypeStat> for TypeStatResponse {
    fn from(stat: TypeStat) -> Self {
        Self {
            type_name: stat.type_name,
            count: stat.count,
            avg_rating: stat.avg_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSide {
    pub period: String,
    pub buckets: Vec<ComparisonBucketResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonBucketResponse {
    pub category: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResponse {
    pub left: ComparisonSide,
    pub right: ComparisonSide,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCountsResponse {
    pub year: i32,
    /// Index 0 is January; months without activity are zero.
    pub counts: Vec<u32>,
}

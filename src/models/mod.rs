pub mod activity;
pub mod activity_type;
pub mod plan;
pub mod folder;
pub mod recommendation;
pub mod setting;

pub use activity::Activity;
pub use activity_type::ActivityType;
pub use plan::{Plan, PlanPriority, PlanScope, PlanStatus};
pub use folder::Folder;
pub use recommendation::{CacheKey, CachedRecommendation};
pub use setting::Setting;

// Caller-facing layer - validation first, storage second, organized by feature.

mod dtos;
pub mod activities;
pub mod plans;
pub mod recommendations;
pub mod reports;
pub mod stats;
pub mod types;

pub use activities::*;
pub use dtos::*;
pub use plans::*;
pub use recommendations::*;
pub use reports::*;
pub use stats::*;
pub use types::*;

use crate::error::AppError;
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn current_timestamp() -> Result<i64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| {
            log::error!("System time error: {}", e);
            AppError::Internal("system clock is before the Unix epoch".to_string())
        })
        .map(|d| d.as_secs() as i64)
}

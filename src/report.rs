//! The rendering seam for period reports.
//!
//! Assembling what goes into a report is core logic (see
//! `service::reports`); laying it out as a PDF is the renderer's
//! problem and stays behind this trait.

use crate::error::AppError;
use crate::stats::TypeStat;
use std::path::Path;

/// The aggregate header of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    /// The period label the report covers; empty for all-time.
    pub period: String,
    pub total: u32,
    pub by_type: Vec<TypeStat>,
}

/// One detail line, in list-view order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: i64,
    pub type_name: String,
    pub name: String,
    pub date: String,
    pub comment: Option<String>,
    pub rating: i32,
    pub end_date: Option<String>,
}

pub trait ReportRenderer {
    fn render(
        &self,
        path: &Path,
        title: &str,
        summary: &ReportSummary,
        rows: &[ReportRow],
    ) -> Result<(), AppError>;
}

//! Tool for showing a single report
//!
//! This module implements the report_get MCP tool.

use serde::Serialize;

use crate::domain::Report;
use crate::storage::ReportStorage;
use crate::tools::{parse_report_id, ServiceError};

/// A report plus the labels and activity breakdown shown next to it
#[derive(Debug, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub month_name: &'static str,
    pub period: String,
    pub materials_handled: u64,
    pub people_served: u64,
    pub total_activity: u64,
}

impl From<Report> for ReportDetail {
    fn from(report: Report) -> Self {
        Self {
            month_name: report.month_name(),
            period: report.period(),
            materials_handled: report.materials_handled(),
            people_served: report.people_served(),
            total_activity: report.total_activity(),
            report,
        }
    }
}

/// Look up one report by ID
pub fn get_report<S: ReportStorage>(
    storage: &S,
    report_id: &str,
) -> Result<ReportDetail, ServiceError> {
    let report_id = parse_report_id(report_id)?;
    let report = storage.get_report(&report_id)?;
    Ok(ReportDetail::from(report))
}

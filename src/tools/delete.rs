//! Tool for removing a report
//!
//! This module implements the report_delete MCP tool.

use serde::Serialize;

use crate::storage::ReportStorage;
use crate::tools::{parse_report_id, ServiceError};

/// Confirmation returned after a delete
#[derive(Debug, Serialize)]
pub struct DeleteReportResponse {
    pub report_id: String,
    pub period: String,
    pub message: String,
}

/// Permanently delete a report
pub fn delete_report<S: ReportStorage>(
    storage: &S,
    report_id: &str,
) -> Result<DeleteReportResponse, ServiceError> {
    let id = parse_report_id(report_id)?;
    let report = storage.get_report(&id)?;
    storage.delete_report(&id)?;

    let period = report.period();
    tracing::info!("Deleted report for {}", period);

    Ok(DeleteReportResponse {
        report_id: id.to_string(),
        message: format!("Report for {} deleted successfully.", period),
        period,
    })
}

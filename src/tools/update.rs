//! Tool for editing an existing report
//!
//! This module implements the report_update MCP tool.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{validate_report, Report, ReportPayload};
use crate::storage::ReportStorage;
use crate::tools::{parse_report_id, ServiceError};

/// Published shape of report_update arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateReportParams {
    /// ID of the report to update
    pub report_id: String,
    #[serde(flatten)]
    pub payload: ReportPayload,
}

/// Replace every field of an existing report
///
/// The whole payload is validated again; a report may keep its own period
/// but not move onto one another report already holds.
pub fn update_report<S: ReportStorage>(
    storage: &S,
    report_id: &str,
    payload: &Map<String, Value>,
) -> Result<Report, ServiceError> {
    let report_id = parse_report_id(report_id)?;
    let input = validate_report(payload)?;
    let report = storage.update_report(&report_id, &input)?;

    tracing::info!("Updated report {} ({})", report.id, report.period());
    Ok(report)
}

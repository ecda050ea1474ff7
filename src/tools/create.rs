//! Tool for recording a new monthly report
//!
//! This module implements the report_create MCP tool.

use serde_json::{Map, Value};

use crate::domain::{validate_report, Report};
use crate::storage::ReportStorage;
use crate::tools::ServiceError;

/// Validate a payload and store it as a new report
///
/// Validation failures and duplicate periods come back unchanged; nothing
/// is written in either case.
pub fn create_report<S: ReportStorage>(
    storage: &S,
    payload: &Map<String, Value>,
) -> Result<Report, ServiceError> {
    let input = validate_report(payload)?;
    let report = storage.create_report(&input)?;

    tracing::info!("Created report for {}", report.period());
    Ok(report)
}

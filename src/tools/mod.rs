//! MCP tools for report management
//!
//! This module contains all the MCP tools that external clients can call
//! to record, browse and chart monthly library reports. Each tool is a
//! plain function over a `ReportStorage`, so the same operations back the
//! JSON-RPC server, the CLI seeder and the tests.

pub mod chart;
pub mod create;
pub mod dashboard;
pub mod delete;
pub mod get;
pub mod list;
pub mod seed;
pub mod update;

// Re-export tool functions for easy access
pub use chart::*;
pub use create::*;
pub use dashboard::*;
pub use delete::*;
pub use get::*;
pub use list::*;
pub use seed::*;
pub use update::*;

use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

use crate::chart::RenderError;
use crate::domain::{ReportId, ValidationError};
use crate::storage::StorageError;

/// Errors a tool can return to its caller
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chart(#[from] RenderError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

/// Parameters for tools that address a single report
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReportIdParams {
    /// ID of the report
    pub report_id: String,
}

/// Parse a client-supplied report ID; an unparseable ID can't match any report
pub fn parse_report_id(report_id: &str) -> Result<ReportId, StorageError> {
    ReportId::from_string(report_id).map_err(|_| StorageError::not_found(report_id))
}

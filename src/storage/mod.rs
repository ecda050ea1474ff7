//! Storage layer for persisting monthly reports
//!
//! This module handles all database operations using SQLite. It provides
//! a clean interface for storing, replacing and listing reports.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Report, ReportId, ReportInput};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Report not found: {report_id}")]
    ReportNotFound { report_id: String },

    #[error("A report for {period} already exists")]
    DuplicatePeriod { year: i32, month: u32, period: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub fn not_found(report_id: impl ToString) -> Self {
        StorageError::ReportNotFound {
            report_id: report_id.to_string(),
        }
    }

    pub fn duplicate_period(year: i32, month: u32) -> Self {
        StorageError::DuplicatePeriod {
            year,
            month,
            period: crate::domain::period(month, year),
        }
    }
}

/// Trait defining the storage interface for reports
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait ReportStorage {
    /// Insert a new report; fails if its (year, month) is already taken
    fn create_report(&self, input: &ReportInput) -> Result<Report, StorageError>;

    /// Get a report by ID
    fn get_report(&self, report_id: &ReportId) -> Result<Report, StorageError>;

    /// Replace every field of an existing report
    fn update_report(
        &self,
        report_id: &ReportId,
        input: &ReportInput,
    ) -> Result<Report, StorageError>;

    /// Permanently remove a report
    fn delete_report(&self, report_id: &ReportId) -> Result<(), StorageError>;

    /// All reports of one year, ordered by month
    fn list_reports_by_year(&self, year: i32) -> Result<Vec<Report>, StorageError>;

    /// Most recently created reports, newest first
    fn list_recent_reports(&self, limit: u32) -> Result<Vec<Report>, StorageError>;

    /// Distinct years that have at least one report, newest first
    fn list_years(&self) -> Result<Vec<i32>, StorageError>;
}

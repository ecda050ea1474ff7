//! Public library interface for the Library Reports MCP server
//!
//! This module exports the main server implementation and public types
//! that can be used by other applications or tests.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

// Internal modules
pub mod analytics;
pub mod chart;
mod domain;
pub mod mcp;
mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{to_chart_rows, year_totals, ChartRow, MonthlyAverages, YearTotals};
pub use domain::*;
pub use storage::{ReportStorage, SqliteStorage, StorageError};
pub use tools::ServiceError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Report service error: {0}")]
    Service(#[from] tools::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main library reports server that implements the MCP protocol
///
/// This server keeps monthly reports in a SQLite database and provides
/// tools for recording them, browsing a year and charting trends.
pub struct LibraryReportsServer {
    storage: SqliteStorage,
}

impl LibraryReportsServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// Create a server whose timestamps and current year come from `clock`
    pub fn with_clock(db_path: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, ServerError> {
        tracing::info!("Initializing Library Reports server with database: {:?}", db_path);

        let storage = SqliteStorage::with_clock(db_path, clock)?;
        Ok(Self { storage })
    }

    /// Create a server backed by a private in-memory database
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self, ServerError> {
        let storage = SqliteStorage::in_memory(clock)?;
        Ok(Self { storage })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let years = self.storage.list_years()?;
        tracing::info!("Server started successfully, found reports for {} years", years.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Insert the demo data set for the current year and the one before
    ///
    /// Returns how many reports were added; existing periods are kept.
    pub fn seed_demo_data(&self) -> Result<usize, ServerError> {
        let current_year = self.clock().current_year();
        Ok(tools::seed_demo_reports(&self.storage, current_year)?)
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// The clock every operation reads "now" from
    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.storage.clock()
    }
}

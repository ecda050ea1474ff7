//! SQLite implementation of the report storage interface
//!
//! This module provides the concrete SQLite implementation for storing
//! and retrieving reports. It handles all SQL queries and data conversion.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::domain::{Clock, Money, Report, ReportId, ReportInput, SystemClock};
use crate::storage::{migrations, ReportStorage, StorageError};

const REPORT_COLUMNS: &str = "id, month, year, new_books, books_borrowed, new_members, \
     total_visitors, fine_collections_cents, notes, created_at, updated_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the ReportStorage trait.
pub struct SqliteStorage {
    conn: Connection,
    clock: Arc<dyn Clock>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance using wall-clock timestamps
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// Create a storage instance whose timestamps come from `clock`
    pub fn with_clock(db_path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn, clock)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Create a throwaway in-memory database
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn, clock)
    }

    fn from_connection(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        // Concurrent writers from other processes wait instead of failing immediately
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn, clock })
    }

    /// The clock this storage stamps reports with
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current time at the precision the database keeps
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }

    /// Start a write transaction that holds the database write lock from the start
    ///
    /// The uniqueness check and the write that follows it must not interleave
    /// with another writer.
    fn write_transaction(&self) -> Result<Transaction<'_>, StorageError> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

/// Fixed-width RFC 3339 so that text order matches time order
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(column, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
        })
}

/// Convert one `REPORT_COLUMNS` row into a Report
fn report_from_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    let id_str: String = row.get(0)?;
    let id = ReportId::from_string(&id_str).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
    })?;

    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    let input = ReportInput {
        month: row.get(1)?,
        year: row.get(2)?,
        new_books: row.get(3)?,
        books_borrowed: row.get(4)?,
        new_members: row.get(5)?,
        total_visitors: row.get(6)?,
        fine_collections: Money::from_cents(row.get(7)?),
        notes: row.get(8)?,
    };

    Ok(Report::from_existing(
        id,
        input,
        parse_timestamp(9, &created_at_str)?,
        parse_timestamp(10, &updated_at_str)?,
    ))
}

fn find_report(conn: &Connection, report_id: &ReportId) -> Result<Option<Report>, StorageError> {
    let sql = format!("SELECT {} FROM library_reports WHERE id = ?1", REPORT_COLUMNS);
    Ok(conn
        .query_row(&sql, params![report_id.to_string()], report_from_row)
        .optional()?)
}

/// Whether (year, month) belongs to a report other than `except`
fn period_taken(
    conn: &Connection,
    year: i32,
    month: u32,
    except: Option<&ReportId>,
) -> Result<bool, StorageError> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM library_reports WHERE year = ?1 AND month = ?2",
            params![year, month],
            |row| row.get(0),
        )
        .optional()?;

    Ok(match (existing, except) {
        (None, _) => false,
        (Some(id), Some(except)) => id != except.to_string(),
        (Some(_), None) => true,
    })
}

/// The unique index is the last line of defence against a duplicate period
fn map_write_error(err: rusqlite::Error, input: &ReportInput) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StorageError::duplicate_period(input.year, input.month)
        }
        _ => StorageError::Query(err),
    }
}

fn collect_reports(
    rows: impl Iterator<Item = rusqlite::Result<Report>>,
) -> Result<Vec<Report>, StorageError> {
    let mut reports = Vec::new();
    for report in rows {
        reports.push(report?);
    }
    Ok(reports)
}

impl ReportStorage for SqliteStorage {
    /// Insert a new report in the database
    fn create_report(&self, input: &ReportInput) -> Result<Report, StorageError> {
        let tx = self.write_transaction()?;

        if period_taken(&tx, input.year, input.month, None)? {
            return Err(StorageError::duplicate_period(input.year, input.month));
        }

        let id = ReportId::new();
        let now = self.now();
        let stamp = format_timestamp(&now);

        tx.execute(
            "INSERT INTO library_reports (
                id, month, year, new_books, books_borrowed, new_members,
                total_visitors, fine_collections_cents, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id.to_string(),
                input.month,
                input.year,
                input.new_books,
                input.books_borrowed,
                input.new_members,
                input.total_visitors,
                input.fine_collections.cents(),
                input.notes,
                stamp,
                stamp
            ],
        )
        .map_err(|e| map_write_error(e, input))?;

        tx.commit()?;

        let report = Report::from_existing(id, input.clone(), now, now);
        tracing::debug!("Created report: {} ({})", report.period(), report.id);
        Ok(report)
    }

    /// Get a report by its ID
    fn get_report(&self, report_id: &ReportId) -> Result<Report, StorageError> {
        find_report(&self.conn, report_id)?.ok_or_else(|| StorageError::not_found(report_id))
    }

    /// Replace every field of an existing report
    fn update_report(
        &self,
        report_id: &ReportId,
        input: &ReportInput,
    ) -> Result<Report, StorageError> {
        let tx = self.write_transaction()?;

        let existing =
            find_report(&tx, report_id)?.ok_or_else(|| StorageError::not_found(report_id))?;

        if period_taken(&tx, input.year, input.month, Some(report_id))? {
            return Err(StorageError::duplicate_period(input.year, input.month));
        }

        let now = self.now();

        tx.execute(
            "UPDATE library_reports SET
                month = ?2,
                year = ?3,
                new_books = ?4,
                books_borrowed = ?5,
                new_members = ?6,
                total_visitors = ?7,
                fine_collections_cents = ?8,
                notes = ?9,
                updated_at = ?10
             WHERE id = ?1",
            params![
                report_id.to_string(),
                input.month,
                input.year,
                input.new_books,
                input.books_borrowed,
                input.new_members,
                input.total_visitors,
                input.fine_collections.cents(),
                input.notes,
                format_timestamp(&now)
            ],
        )
        .map_err(|e| map_write_error(e, input))?;

        tx.commit()?;

        let report = Report::from_existing(report_id.clone(), input.clone(), existing.created_at, now);
        tracing::debug!("Updated report: {} ({})", report.period(), report.id);
        Ok(report)
    }

    /// Permanently delete a report
    fn delete_report(&self, report_id: &ReportId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM library_reports WHERE id = ?1",
            params![report_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::not_found(report_id));
        }

        tracing::debug!("Deleted report: {}", report_id);
        Ok(())
    }

    /// List one year's reports in month order
    fn list_reports_by_year(&self, year: i32) -> Result<Vec<Report>, StorageError> {
        let sql = format!(
            "SELECT {} FROM library_reports WHERE year = ?1 ORDER BY month ASC",
            REPORT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![year], report_from_row)?;
        collect_reports(rows)
    }

    /// List the newest reports; ties on created_at fall back to insertion order
    fn list_recent_reports(&self, limit: u32) -> Result<Vec<Report>, StorageError> {
        let sql = format!(
            "SELECT {} FROM library_reports ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            REPORT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit], report_from_row)?;
        collect_reports(rows)
    }

    /// List the distinct years that have reports
    fn list_years(&self) -> Result<Vec<i32>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT year FROM library_reports ORDER BY year DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, i32>(0))?;

        let mut years = Vec::new();
        for year in rows {
            years.push(year?);
        }
        Ok(years)
    }
}

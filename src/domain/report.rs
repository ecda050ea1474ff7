//! Report entity and related functionality
//!
//! This module defines the monthly `Report` record, the validated
//! `ReportInput` that creates or replaces one, and the derived labels
//! (month name, period) shown alongside it.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Money, ReportId};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name for a month number, or "Unknown" outside 1-12
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Three-letter label used on chart axes ("Jan", "Feb", ...)
pub fn month_abbrev(month: u32) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}

/// Human-readable "Month Year" label
pub fn period(month: u32, year: i32) -> String {
    format!("{} {}", month_name(month), year)
}

/// One month of library activity
///
/// At most one report exists per (year, month). The id and timestamps are
/// assigned by the storage layer; everything else comes from a validated
/// `ReportInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier for this report
    pub id: ReportId,
    /// Reporting month (1-12)
    pub month: u32,
    /// Reporting year (2000-2100)
    pub year: i32,
    /// New books added to the collection
    pub new_books: u32,
    /// Books lent out during the month
    pub books_borrowed: u32,
    /// New library members registered
    pub new_members: u32,
    /// Total visitors through the door
    pub total_visitors: u32,
    /// Fines collected during the month
    pub fine_collections: Money,
    /// Free-text observations
    pub notes: Option<String>,
    /// When this report was first stored
    pub created_at: DateTime<Utc>,
    /// When this report was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create a report from existing data (used when loading from database)
    ///
    /// This constructor assumes the input has already passed validation.
    pub fn from_existing(
        id: ReportId,
        input: ReportInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            month: input.month,
            year: input.year,
            new_books: input.new_books,
            books_borrowed: input.books_borrowed,
            new_members: input.new_members,
            total_visitors: input.total_visitors,
            fine_collections: input.fine_collections,
            notes: input.notes,
            created_at,
            updated_at,
        }
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    pub fn period(&self) -> String {
        period(self.month, self.year)
    }

    /// New books plus books borrowed
    pub fn materials_handled(&self) -> u64 {
        self.new_books as u64 + self.books_borrowed as u64
    }

    /// New members plus visitors
    pub fn people_served(&self) -> u64 {
        self.new_members as u64 + self.total_visitors as u64
    }

    pub fn total_activity(&self) -> u64 {
        self.materials_handled() + self.people_served()
    }

    /// The user-supplied fields of this report, without id or timestamps
    pub fn input(&self) -> ReportInput {
        ReportInput {
            month: self.month,
            year: self.year,
            new_books: self.new_books,
            books_borrowed: self.books_borrowed,
            new_members: self.new_members,
            total_visitors: self.total_visitors,
            fine_collections: self.fine_collections,
            notes: self.notes.clone(),
        }
    }
}

/// A normalized, validated set of report fields
///
/// Only `domain::validate_report` produces these from untrusted input; the
/// storage layer writes them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    pub month: u32,
    pub year: i32,
    pub new_books: u32,
    pub books_borrowed: u32,
    pub new_members: u32,
    pub total_visitors: u32,
    pub fine_collections: Money,
    pub notes: Option<String>,
}

/// Typed shape of a report payload as clients send it
///
/// Incoming tool arguments are validated field by field from raw JSON, so
/// this struct is what callers build payloads from and what the published
/// tool schema describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportPayload {
    /// Reporting month (1-12)
    pub month: i64,
    /// Reporting year (2000-2100)
    pub year: i64,
    /// Number of new books added
    pub new_books: i64,
    /// Number of books borrowed
    pub books_borrowed: i64,
    /// Number of new members registered
    pub new_members: i64,
    /// Total number of visitors
    pub total_visitors: i64,
    /// Fine collections in currency, two decimal places
    pub fine_collections: f64,
    /// Optional notes, at most 1000 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReportPayload {
    /// Convert into the JSON object form the validator consumes
    pub fn to_arguments(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

//! Tool for the dashboard overview
//!
//! This module implements the report_dashboard MCP tool.

use serde::Serialize;

use crate::analytics::{to_chart_rows, year_totals, ChartRow, MonthlyAverages, YearTotals};
use crate::domain::Report;
use crate::storage::ReportStorage;
use crate::tools::ServiceError;

/// Number of reports shown in the dashboard's "recent" list
pub const RECENT_REPORTS_LIMIT: u32 = 6;

/// Recent activity plus the current year's totals and trends
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub recent_reports: Vec<Report>,
    pub year_totals: YearTotals,
    pub averages: MonthlyAverages,
    pub total_activity: u64,
    pub chart_rows: Vec<ChartRow>,
    pub current_year: i32,
}

/// Build the dashboard for `current_year`
pub fn dashboard<S: ReportStorage>(
    storage: &S,
    current_year: i32,
) -> Result<DashboardView, ServiceError> {
    let recent_reports = storage.list_recent_reports(RECENT_REPORTS_LIMIT)?;
    let reports = storage.list_reports_by_year(current_year)?;
    let totals = year_totals(&reports);

    Ok(DashboardView {
        recent_reports,
        averages: totals.averages(),
        total_activity: totals.total_activity(),
        year_totals: totals,
        chart_rows: to_chart_rows(&reports),
        current_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManualClock, Money, ReportInput};
    use crate::storage::SqliteStorage;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn input(year: i32, month: u32, new_books: u32) -> ReportInput {
        ReportInput {
            month,
            year,
            new_books,
            books_borrowed: 300,
            new_members: 20,
            total_visitors: 1200,
            fine_collections: Money::from_cents(15000),
            notes: None,
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let storage = SqliteStorage::in_memory(Arc::new(ManualClock::new(Utc::now()))).unwrap();

        let view = dashboard(&storage, 2024).unwrap();

        assert!(view.recent_reports.is_empty());
        assert!(view.chart_rows.is_empty());
        assert_eq!(view.year_totals.reports_count, 0);
        assert_eq!(view.averages, MonthlyAverages::default());
        assert_eq!(view.total_activity, 0);
        assert_eq!(view.current_year, 2024);
    }

    #[test]
    fn test_dashboard_limits_recent_and_scopes_totals() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap(),
        ));
        let storage = SqliteStorage::in_memory(clock.clone()).unwrap();

        for month in 1..=12 {
            storage.create_report(&input(2023, month, 30)).unwrap();
            clock.advance(Duration::seconds(1));
        }
        for month in 1..=3 {
            storage.create_report(&input(2024, month, 20 + month)).unwrap();
            clock.advance(Duration::seconds(1));
        }

        let view = dashboard(&storage, 2024).unwrap();

        assert_eq!(view.recent_reports.len(), RECENT_REPORTS_LIMIT as usize);
        assert_eq!(view.recent_reports[0].period(), "March 2024");
        assert_eq!(view.recent_reports[3].period(), "December 2023");

        assert_eq!(view.year_totals.reports_count, 3);
        assert_eq!(view.year_totals.new_books, 21 + 22 + 23);
        assert_eq!(view.averages.new_books, 22);
        assert_eq!(view.averages.fine_collections, Money::from_cents(15000));
        assert_eq!(view.total_activity, view.year_totals.total_activity());
        assert_eq!(view.chart_rows.len(), 3);
    }
}

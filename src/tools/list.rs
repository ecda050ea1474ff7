//! Tool for browsing one year of reports
//!
//! This module implements the report_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{to_chart_rows, year_totals, ChartRow, YearTotals};
use crate::domain::Report;
use crate::storage::ReportStorage;
use crate::tools::ServiceError;

/// Parameters for listing reports
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListReportsParams {
    /// Year to show; defaults to the current year
    pub year: Option<i32>,
}

/// Everything the yearly reports page shows
#[derive(Debug, Serialize)]
pub struct ReportListView {
    pub reports: Vec<Report>,
    pub year_totals: YearTotals,
    pub chart_rows: Vec<ChartRow>,
    pub available_years: Vec<i32>,
    pub selected_year: i32,
}

/// List one year's reports with their totals and chart rows
pub fn list_reports<S: ReportStorage>(
    storage: &S,
    params: ListReportsParams,
    current_year: i32,
) -> Result<ReportListView, ServiceError> {
    let selected_year = params.year.unwrap_or(current_year);

    let reports = storage.list_reports_by_year(selected_year)?;
    let available_years = storage.list_years()?;

    tracing::debug!("Listed {} reports for {}", reports.len(), selected_year);

    Ok(ReportListView {
        year_totals: year_totals(&reports),
        chart_rows: to_chart_rows(&reports),
        reports,
        available_years,
        selected_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, ReportInput, SystemClock};
    use crate::storage::SqliteStorage;
    use std::sync::Arc;

    fn input(year: i32, month: u32) -> ReportInput {
        ReportInput {
            month,
            year,
            new_books: 10 * month,
            books_borrowed: 100,
            new_members: 2,
            total_visitors: 400,
            fine_collections: Money::from_cents(1050),
            notes: None,
        }
    }

    #[test]
    fn test_list_defaults_to_current_year() {
        let storage = SqliteStorage::in_memory(Arc::new(SystemClock)).unwrap();
        for month in [3, 1, 2] {
            storage.create_report(&input(2024, month)).unwrap();
        }
        storage.create_report(&input(2023, 12)).unwrap();

        let view = list_reports(&storage, ListReportsParams::default(), 2024).unwrap();

        assert_eq!(view.selected_year, 2024);
        let months: Vec<u32> = view.reports.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![1, 2, 3]);
        assert_eq!(view.chart_rows.len(), 3);
        assert_eq!(view.chart_rows[0].month_name, "January");
        assert_eq!(view.year_totals.new_books, 60);
        assert_eq!(view.year_totals.fine_collections, Money::from_cents(3150));
        assert_eq!(view.year_totals.reports_count, 3);
        assert_eq!(view.available_years, vec![2024, 2023]);
    }

    #[test]
    fn test_list_empty_year() {
        let storage = SqliteStorage::in_memory(Arc::new(SystemClock)).unwrap();
        storage.create_report(&input(2023, 5)).unwrap();

        let view = list_reports(&storage, ListReportsParams { year: Some(2019) }, 2024).unwrap();

        assert_eq!(view.selected_year, 2019);
        assert!(view.reports.is_empty());
        assert!(view.chart_rows.is_empty());
        assert_eq!(view.year_totals, YearTotals::default());
        assert_eq!(view.available_years, vec![2023]);
    }
}

//! Year-scoped aggregation of monthly reports
//!
//! Totals and chart rows are recomputed from the reports on every read;
//! nothing here touches storage.

use serde::{Deserialize, Serialize};

use crate::domain::{Money, Report};

/// Sums of every numeric report field over a set of reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearTotals {
    pub new_books: u64,
    pub books_borrowed: u64,
    pub new_members: u64,
    pub total_visitors: u64,
    pub fine_collections: Money,
    pub reports_count: usize,
}

/// Per-month averages shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyAverages {
    /// New books per report, rounded to the nearest whole book
    pub new_books: u64,
    /// New members per report, rounded to the nearest whole member
    pub new_members: u64,
    /// Fine revenue per report, rounded to the nearest cent
    pub fine_collections: Money,
}

impl YearTotals {
    /// Fold one more report into the totals
    pub fn add(&mut self, report: &Report) {
        self.new_books += report.new_books as u64;
        self.books_borrowed += report.books_borrowed as u64;
        self.new_members += report.new_members as u64;
        self.total_visitors += report.total_visitors as u64;
        self.fine_collections = self.fine_collections + report.fine_collections;
        self.reports_count += 1;
    }

    /// Combine totals computed over two disjoint sets of reports
    pub fn merge(self, other: YearTotals) -> YearTotals {
        YearTotals {
            new_books: self.new_books + other.new_books,
            books_borrowed: self.books_borrowed + other.books_borrowed,
            new_members: self.new_members + other.new_members,
            total_visitors: self.total_visitors + other.total_visitors,
            fine_collections: self.fine_collections + other.fine_collections,
            reports_count: self.reports_count + other.reports_count,
        }
    }

    /// Sum of the four count totals
    pub fn total_activity(&self) -> u64 {
        self.new_books + self.books_borrowed + self.new_members + self.total_visitors
    }

    /// Averages per report; all zero when there are no reports
    pub fn averages(&self) -> MonthlyAverages {
        let count = self.reports_count as u64;
        if count == 0 {
            return MonthlyAverages::default();
        }

        MonthlyAverages {
            new_books: div_round(self.new_books, count),
            new_members: div_round(self.new_members, count),
            fine_collections: self.fine_collections.div_round(count),
        }
    }
}

/// Round-half-up integer division
fn div_round(total: u64, count: u64) -> u64 {
    (total * 2 + count) / (count * 2)
}

/// Sum every numeric field across `reports`
pub fn year_totals(reports: &[Report]) -> YearTotals {
    let mut totals = YearTotals::default();
    for report in reports {
        totals.add(report);
    }
    totals
}

/// One month's values in the shape chart geometry consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub month: u32,
    pub month_name: String,
    pub new_books: u32,
    pub books_borrowed: u32,
    pub new_members: u32,
    pub total_visitors: u32,
    pub fine_collections: f64,
}

impl From<&Report> for ChartRow {
    fn from(report: &Report) -> Self {
        Self {
            month: report.month,
            month_name: report.month_name().to_string(),
            new_books: report.new_books,
            books_borrowed: report.books_borrowed,
            new_members: report.new_members,
            total_visitors: report.total_visitors,
            fine_collections: report.fine_collections.to_f64(),
        }
    }
}

/// Map reports to chart rows, keeping their order
///
/// Callers pass reports already sorted by month.
pub fn to_chart_rows(reports: &[Report]) -> Vec<ChartRow> {
    reports.iter().map(ChartRow::from).collect()
}

//! End-to-end report workflows through the public tool functions
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use library_reports_mcp::chart::{line_chart, ChartLayout};
use library_reports_mcp::tools::{self, ChartOutput, ChartParams, ListReportsParams};
use library_reports_mcp::*;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn setup() -> (TempDir, LibraryReportsServer, Arc<ManualClock>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
    ));
    let server = LibraryReportsServer::with_clock(dir.path().join("reports.db"), clock.clone())
        .expect("Failed to create server");
    (dir, server, clock)
}

fn payload(year: i32, month: u32, new_books: u32) -> Map<String, Value> {
    match json!({
        "month": month,
        "year": year,
        "new_books": new_books,
        "books_borrowed": 300 + month,
        "new_members": 10 + month,
        "total_visitors": 1000 + month * 10,
        "fine_collections": 150.25,
        "notes": format!("Month {}", month),
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn test_create_then_get_returns_input() {
    let (_dir, server, clock) = setup();

    let created = tools::create_report(server.storage(), &payload(2024, 3, 25)).unwrap();
    let fetched = tools::get_report(server.storage(), &created.id.to_string()).unwrap();

    assert_eq!(fetched.report, created);
    assert_eq!(fetched.report.month, 3);
    assert_eq!(fetched.report.books_borrowed, 303);
    assert_eq!(fetched.report.fine_collections, Money::from_cents(15025));
    assert_eq!(fetched.report.notes.as_deref(), Some("Month 3"));
    assert_eq!(fetched.report.created_at, clock.now());
    assert_eq!(fetched.period, "March 2024");
}

#[test]
fn test_duplicate_period_leaves_store_unchanged() {
    let (_dir, server, _clock) = setup();

    let first = tools::create_report(server.storage(), &payload(2024, 3, 25)).unwrap();
    let second = tools::create_report(server.storage(), &payload(2024, 3, 99));

    assert!(matches!(
        second,
        Err(ServiceError::Storage(StorageError::DuplicatePeriod { year: 2024, month: 3, .. }))
    ));
    let reports = server.storage().list_reports_by_year(2024).unwrap();
    assert_eq!(reports, vec![first]);
}

#[test]
fn test_half_year_listing_and_totals() {
    let (_dir, server, clock) = setup();

    for month in [4, 2, 6, 1, 5, 3] {
        tools::create_report(server.storage(), &payload(2024, month, month * 5)).unwrap();
        clock.advance(Duration::seconds(1));
    }

    let view = tools::list_reports(server.storage(), ListReportsParams::default(), 2024).unwrap();

    let months: Vec<u32> = view.reports.iter().map(|r| r.month).collect();
    assert_eq!(months, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(view.year_totals.reports_count, 6);
    assert_eq!(view.year_totals.new_books, (1..=6).map(|m| m * 5).sum::<u64>());
    assert_eq!(view.year_totals.books_borrowed, (1..=6).map(|m| 300 + m).sum::<u64>());
    assert_eq!(view.year_totals.new_members, (1..=6).map(|m| 10 + m).sum::<u64>());
    assert_eq!(view.year_totals.total_visitors, (1..=6).map(|m| 1000 + m * 10).sum::<u64>());
    assert_eq!(view.year_totals.fine_collections, Money::from_cents(15025 * 6));
    assert_eq!(view.chart_rows.len(), 6);
    assert_eq!(view.chart_rows[5].month_name, "June");
    assert_eq!(view.available_years, vec![2024]);
}

#[test]
fn test_update_advances_updated_at_only() {
    let (_dir, server, clock) = setup();

    let created = tools::create_report(server.storage(), &payload(2024, 3, 25)).unwrap();
    clock.advance(Duration::hours(2));

    let updated =
        tools::update_report(server.storage(), &created.id.to_string(), &payload(2024, 3, 50))
            .unwrap();
    let fetched = server.storage().get_report(&created.id).unwrap();

    assert_eq!(fetched.new_books, 50);
    assert_eq!(fetched, updated);
    assert_eq!(fetched.created_at, created.created_at);
    assert!(fetched.updated_at > created.updated_at);
}

#[test]
fn test_delete_removes_from_year() {
    let (_dir, server, _clock) = setup();

    let march = tools::create_report(server.storage(), &payload(2024, 3, 25)).unwrap();
    tools::create_report(server.storage(), &payload(2024, 4, 30)).unwrap();

    tools::delete_report(server.storage(), &march.id.to_string()).unwrap();

    assert!(matches!(
        tools::get_report(server.storage(), &march.id.to_string()),
        Err(ServiceError::Storage(StorageError::ReportNotFound { .. }))
    ));
    let view =
        tools::list_reports(server.storage(), ListReportsParams { year: Some(2024) }, 2024).unwrap();
    assert!(view.reports.iter().all(|r| r.id != march.id));
    assert_eq!(view.year_totals.reports_count, 1);
}

#[test]
fn test_dashboard_over_seeded_data() {
    let (_dir, server, _clock) = setup();
    server.seed_demo_data().unwrap();

    let view = tools::dashboard(server.storage(), 2024).unwrap();

    assert_eq!(view.current_year, 2024);
    assert_eq!(view.recent_reports.len(), 6);
    assert_eq!(view.year_totals.reports_count, 6);
    assert_eq!(view.year_totals.new_books, 199);
    assert_eq!(view.year_totals.fine_collections, Money::from_cents(118375));
    assert_eq!(view.averages.new_books, 33);
    assert_eq!(view.averages.fine_collections, Money::from_cents(19729));
    assert_eq!(view.chart_rows.len(), 6);
}

#[test]
fn test_chart_of_a_single_month() {
    let (_dir, server, _clock) = setup();
    tools::create_report(server.storage(), &payload(2024, 5, 0)).unwrap();

    let rows = tools::list_reports(server.storage(), ListReportsParams::default(), 2024)
        .unwrap()
        .chart_rows;
    let drawing = line_chart(&rows, &ChartLayout::default());
    for line in &drawing.polylines {
        assert_eq!(line.points.len(), 1);
        assert_eq!(line.points[0].x, 40.0);
    }

    let params = ChartParams {
        format: Some("json".to_string()),
        ..Default::default()
    };
    match tools::render_chart(server.storage(), params, 2024).unwrap() {
        ChartOutput::Drawing(json_drawing) => assert_eq!(json_drawing, drawing),
        other => panic!("expected drawing, got {:?}", other),
    }
}

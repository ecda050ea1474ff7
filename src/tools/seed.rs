//! Demo data for a fresh database
//!
//! Backs the `--seed` command line flag: six months of the current year and
//! a full previous year, so the dashboard and charts have something to show.

use crate::domain::{Money, ReportInput};
use crate::storage::{ReportStorage, StorageError};
use crate::tools::ServiceError;

/// (month, new_books, books_borrowed, new_members, total_visitors, fine cents, notes)
type DemoRow = (u32, u32, u32, u32, u32, i64, &'static str);

const CURRENT_YEAR_ROWS: [DemoRow; 6] = [
    (1, 25, 342, 18, 1250, 18550, "Strong start to the year with good member acquisition."),
    (2, 32, 289, 14, 1180, 21075, "Valentine's Day romance book display was very popular."),
    (3, 28, 398, 22, 1420, 15625, "Spring reading program launched with great success."),
    (4, 35, 445, 19, 1380, 19800, "Poetry month events drew larger crowds than expected."),
    (5, 41, 512, 26, 1650, 24350, "Mother's Day cookbook section expansion was well received."),
    (6, 38, 478, 31, 1580, 18975, "Summer reading program registration opened with high enthusiasm."),
];

const PREVIOUS_YEAR_ROWS: [DemoRow; 12] = [
    (1, 22, 315, 16, 1150, 16525, "New Year resolution readers brought good traffic."),
    (2, 18, 278, 12, 1050, 14250, "Shorter month showed in visitor numbers."),
    (3, 29, 356, 20, 1280, 17675, "Spring break increased student visits significantly."),
    (4, 31, 402, 18, 1320, 19325, "Earth Day environmental book display was popular."),
    (5, 27, 389, 15, 1290, 15850, "Graduation season brought many returning alumni."),
    (6, 33, 445, 25, 1450, 20175, "Summer reading program kickoff was very successful."),
    (7, 24, 378, 14, 1180, 14525, "Summer vacation period with reduced regular visitors."),
    (8, 26, 298, 11, 980, 12850, "Quietest month due to summer activities and travel."),
    (9, 39, 534, 28, 1620, 26725, "Back-to-school season brought surge in all activities."),
    (10, 35, 467, 22, 1480, 23450, "Halloween story time events were very popular with families."),
    (11, 42, 512, 19, 1390, 19875, "Thanksgiving cooking books and holiday crafts in high demand."),
    (12, 28, 423, 16, 1250, 17525, "Holiday season with gift book recommendations and year-end events."),
];

fn demo_input(year: i32, row: &DemoRow) -> ReportInput {
    let (month, new_books, books_borrowed, new_members, total_visitors, fine_cents, notes) = *row;
    ReportInput {
        month,
        year,
        new_books,
        books_borrowed,
        new_members,
        total_visitors,
        fine_collections: Money::from_cents(fine_cents),
        notes: Some(notes.to_string()),
    }
}

/// Insert the demo reports, leaving any existing period untouched
///
/// Returns how many reports were inserted.
pub fn seed_demo_reports<S: ReportStorage>(
    storage: &S,
    current_year: i32,
) -> Result<usize, ServiceError> {
    let rows = CURRENT_YEAR_ROWS
        .iter()
        .map(|row| demo_input(current_year, row))
        .chain(
            PREVIOUS_YEAR_ROWS
                .iter()
                .map(|row| demo_input(current_year - 1, row)),
        );

    let mut inserted = 0;
    for input in rows {
        match storage.create_report(&input) {
            Ok(_) => inserted += 1,
            Err(StorageError::DuplicatePeriod { period, .. }) => {
                tracing::debug!("Skipping demo report for {}, period already recorded", period);
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Seeded {} demo reports", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::year_totals;
    use crate::domain::SystemClock;
    use crate::storage::SqliteStorage;
    use std::sync::Arc;

    #[test]
    fn test_seed_fills_two_years() {
        let storage = SqliteStorage::in_memory(Arc::new(SystemClock)).unwrap();

        assert_eq!(seed_demo_reports(&storage, 2025).unwrap(), 18);
        assert_eq!(storage.list_years().unwrap(), vec![2025, 2024]);

        let current = storage.list_reports_by_year(2025).unwrap();
        assert_eq!(current.len(), 6);
        let totals = year_totals(&current);
        assert_eq!(totals.new_books, 25 + 32 + 28 + 35 + 41 + 38);
        assert_eq!(totals.fine_collections, Money::from_cents(118375));

        assert_eq!(storage.list_reports_by_year(2024).unwrap().len(), 12);
    }

    #[test]
    fn test_seed_skips_existing_periods() {
        let storage = SqliteStorage::in_memory(Arc::new(SystemClock)).unwrap();
        let existing = storage
            .create_report(&demo_input(2025, &(3, 1, 1, 1, 1, 100, "Own data")))
            .unwrap();

        assert_eq!(seed_demo_reports(&storage, 2025).unwrap(), 17);
        assert_eq!(storage.get_report(&existing.id).unwrap(), existing);

        // running again inserts nothing
        assert_eq!(seed_demo_reports(&storage, 2025).unwrap(), 0);
    }
}

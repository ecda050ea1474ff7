//! Basic unit tests to verify core functionality
use library_reports_mcp::*;
use serde_json::json;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_month_names_and_period() {
        assert_eq!(month_name(3), "March");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
        assert_eq!(period(3, 2024), "March 2024");
    }

    #[test]
    fn test_valid_payload() {
        let args = json!({
            "month": 3,
            "year": 2024,
            "new_books": 25,
            "books_borrowed": 150,
            "new_members": 10,
            "total_visitors": 500,
            "fine_collections": 125.5,
            "notes": "",
        });

        let input = validate_report(args.as_object().unwrap()).unwrap();
        assert_eq!(input.month, 3);
        assert_eq!(input.fine_collections, Money::from_cents(12550));
        assert_eq!(input.notes, None);
    }

    #[test]
    fn test_invalid_payload_collects_every_field() {
        let args = json!({
            "month": 0,
            "year": 1999,
            "new_books": -1,
            "fine_collections": "abc",
        });

        let err = validate_report(args.as_object().unwrap()).unwrap_err();
        for field in [
            "month",
            "year",
            "new_books",
            "books_borrowed",
            "new_members",
            "total_visitors",
            "fine_collections",
        ] {
            assert!(err.has(field), "missing error for {}", field);
        }
        assert!(!err.has("notes"));
    }

    #[test]
    fn test_empty_year_totals() {
        let totals = year_totals(&[]);
        assert_eq!(totals.reports_count, 0);
        assert_eq!(totals.new_books, 0);
        assert_eq!(totals.fine_collections, Money::ZERO);
    }

    #[test]
    fn test_money_text_form() {
        let money: Money = "185.5".parse().unwrap();
        assert_eq!(money.cents(), 18550);
        assert_eq!(money.to_string(), "185.50");
        assert!("1.005".parse::<Money>().is_err());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = LibraryReportsServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }
}

//! Basic integration tests
use library_reports_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_starts_with_empty_database() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = LibraryReportsServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");

        assert!(server.storage().list_years().unwrap().is_empty());
        assert!(server.storage().list_recent_reports(6).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = LibraryReportsServer::new(db_path.clone())
            .await
            .expect("Failed to create first server");
        let inserted = server.seed_demo_data().expect("Failed to seed");
        assert_eq!(inserted, 18);
        drop(server);

        let reopened = LibraryReportsServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let current_year = reopened.clock().current_year();
        assert_eq!(
            reopened.storage().list_years().unwrap(),
            vec![current_year, current_year - 1]
        );

        // seeding again keeps the existing rows
        assert_eq!(reopened.seed_demo_data().unwrap(), 0);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        let _: &dyn ReportStorage = &storage;
        assert!(storage.list_reports_by_year(2024).unwrap().is_empty());
    }
}

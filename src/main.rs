//! Main entry point for the Library Reports MCP server
//!
//! This file sets up logging, parses command line arguments, and starts the MCP server.
//! The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use library_reports_mcp::LibraryReportsServer;

const DB_FILE_NAME: &str = "library_reports.db";

/// Get the default database path, trying each candidate directory in turn
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".library_reports")),
        dirs::data_dir().map(|p| p.join("library_reports")),
        dirs::config_dir().map(|p| p.join("library_reports")),
        std::env::current_dir().ok().map(|p| p.join(".library_reports")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Make sure the directory is actually writable
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join(DB_FILE_NAME));
            }
        }
    }

    let temp_path = std::env::temp_dir().join("library_reports");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join(DB_FILE_NAME))
}

/// Command line arguments for the Library Reports MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    /// Insert demo reports for this year and last year before serving
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("library_reports_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting Library Reports MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = LibraryReportsServer::new(db_path).await?;

    if args.seed {
        let inserted = server.seed_demo_data()?;
        info!("Seeded {} demo reports", inserted);
    }

    server.run().await?;

    info!("Library Reports MCP server shutdown complete");
    Ok(())
}

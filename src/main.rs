//! Fitness Meal Planner (FMP)
//!
//! An MCP server for goal-based meal plans and calendar export.

use std::path::PathBuf;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use fmp::calendar::CalendarExporter;
use fmp::mcp::FmpService;
use fmp::{build_info, db};

/// Database path from `FMP_DATABASE_PATH`, or `data/fmp.db` at the project root
fn get_database_path() -> PathBuf {
    std::env::var("FMP_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // target/{debug,release} -> project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(root) = path.parent().and_then(|p| p.parent()) {
                    path = root.to_path_buf();
                }
            }

            path.push("data");
            path.push("fmp.db");
            path
        })
}

/// Where calendar files go unless a tool call names a path
fn get_export_dir() -> PathBuf {
    std::env::var("FMP_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fmp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = get_database_path();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let export_dir = get_export_dir();
    let exporter = CalendarExporter::from_env();
    tracing::info!(
        export_dir = %export_dir.display(),
        timezone = exporter.timezone(),
        "calendar export configured"
    );

    let service = FmpService::new(db_path, database, exporter, export_dir);
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}

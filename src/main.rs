//! SweatStats
//!
//! An MCP server for workout analytics.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use sweatstats::build_info;
use sweatstats::config::DashboardConfig;
use sweatstats::db::{self, Location};
use sweatstats::mcp::SweatService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sweatstats=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = DashboardConfig::from_env()?;
    let location = Location::from_descriptor(&config.database);
    eprintln!("Database: {}", location.describe());

    // Ensure data directory exists
    if let Location::File(path) = &location {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = db::Database::open(&config.database)?;

    // Run migrations
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;
    database.ping()?;

    let range = config.default_range()?;
    tracing::info!(
        table = config.table.as_str(),
        metric = %config.metric,
        period = %config.period,
        agg_type = %config.agg_type,
        start = %range.start,
        end = %range.end,
        "dashboard defaults"
    );

    let service = SweatService::new(database, config);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}

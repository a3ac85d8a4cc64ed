//! Print the workout dashboard for the configured database
//!
//! Usage: workout_report [metric] [period] [agg_type] [start_date] [end_date]
//!
//! Anything omitted comes from the `SWEATSTATS_*` environment variables.

use sweatstats::build_info::BuildInfo;
use sweatstats::config::DashboardConfig;
use sweatstats::tools::dashboard::{format_dashboard, workout_dashboard, Selection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str).filter(|s| *s != "-");

    let selection = Selection {
        metric: arg(0),
        period: arg(1),
        agg_type: arg(2),
        start_date: arg(3),
        end_date: arg(4),
    };

    let config = DashboardConfig::from_env()?;
    // Fail on a bad selection before opening anything
    selection.resolve(&config)?;

    println!("{}", BuildInfo::current().version_line());
    println!("Database: {}", config.database);
    let database = sweatstats::db::Database::open(&config.database)?;

    // Run migrations
    database.with_conn(|conn| {
        sweatstats::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let dashboard = workout_dashboard(&database, &config, &selection)?;
    print!("{}", format_dashboard(&dashboard));

    Ok(())
}

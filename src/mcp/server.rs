//! SweatStats MCP Server Implementation
//!
//! Implements the MCP server with all SweatStats tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::DashboardConfig;
use crate::db::Database;
use crate::error::WorkoutError;
use crate::tools::dashboard::{self, Selection};
use crate::tools::status::StatusTracker;

/// SweatStats MCP Service
#[derive(Clone)]
pub struct SweatService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: Arc<DashboardConfig>,
    tool_router: ToolRouter<SweatService>,
}

impl SweatService {
    pub fn new(database: Database, config: DashboardConfig) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database.clone()))),
            database,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }
}

/// Bad caller input becomes `invalid_params`; everything else is internal
fn tool_error(e: WorkoutError) -> McpError {
    if e.is_validation() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        tracing::error!(error = %e, "tool call failed");
        McpError::internal_error(e.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutDataParams {
    /// Metric column, e.g. "distance_mi" (defaults to the configured metric)
    pub metric: Option<String>,
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AggregateParams {
    /// Metric column, e.g. "distance_mi" (defaults to the configured metric)
    pub metric: Option<String>,
    /// One of sum, mean, std, min, max, count, skew, median, kurt
    pub agg_type: Option<String>,
    /// "week" or "month"
    pub period: Option<String>,
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HistogramParams {
    pub metric: Option<String>,
    /// Number of equal-width bins, 1 to 1000 (default 15)
    pub bins: Option<usize>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WorkoutDataParams {
    fn selection(&self) -> Selection<'_> {
        Selection {
            metric: self.metric.as_deref(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
            ..Selection::default()
        }
    }
}

impl AggregateParams {
    fn selection(&self) -> Selection<'_> {
        Selection {
            metric: self.metric.as_deref(),
            agg_type: self.agg_type.as_deref(),
            period: self.period.as_deref(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SweatService {
    // --- Status ---

    #[tool(description = "Get the current status of the SweatStats service including build info, database reachability, and process information")]
    async fn sweatstats_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for querying the workout dashboard. Call this when unsure which metric, period, or aggregation names are valid.")]
    fn dashboard_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DASHBOARD_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DASHBOARD_INSTRUCTIONS)]))
    }

    // --- Workouts ---

    #[tool(description = "List the workout metrics that can be queried, with display names and units")]
    fn list_metrics(&self) -> Result<CallToolResult, McpError> {
        json_result(&dashboard::list_metrics())
    }

    #[tool(description = "Get raw workout rows (date, activity type, metric value) for an inclusive date range")]
    fn get_workout_data(&self, Parameters(p): Parameters<WorkoutDataParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_workout_data(&self.database, &self.config, &p.selection()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Aggregate a workout metric by ISO week or calendar month, with summary statistics over the whole range")]
    fn aggregate_workouts(&self, Parameters(p): Parameters<AggregateParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::aggregate_workouts(&self.database, &self.config, &p.selection()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Equal-width histogram of a workout metric over an inclusive date range")]
    fn workout_histogram(&self, Parameters(p): Parameters<HistogramParams>) -> Result<CallToolResult, McpError> {
        let selection = Selection {
            metric: p.metric.as_deref(),
            start_date: p.start_date.as_deref(),
            end_date: p.end_date.as_deref(),
            ..Selection::default()
        };
        let result = dashboard::workout_histogram(&self.database, &self.config, &selection, p.bins).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Per-weekday count, mean, and 10-bin histogram of a workout metric")]
    fn day_of_week_distribution(&self, Parameters(p): Parameters<WorkoutDataParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::day_of_week(&self.database, &self.config, &p.selection()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Full workout dashboard: period aggregate, summary statistics, earliest/latest workout, histogram, and day-of-week distribution")]
    fn workout_dashboard(&self, Parameters(p): Parameters<AggregateParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::workout_dashboard(&self.database, &self.config, &p.selection()).map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for SweatService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sweatstats".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("SweatStats Workout Analytics".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SweatStats - Workout analytics over a workout summary table. \
                 Call dashboard_instructions first if unsure of metric or aggregation names. \
                 Discovery: list_metrics, sweatstats_status. \
                 Data: get_workout_data. \
                 Analytics: aggregate_workouts, workout_histogram, day_of_week_distribution, workout_dashboard."
                    .into(),
            ),
        }
    }
}

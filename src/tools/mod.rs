//! SweatStats Tools module
//!
//! Tool implementations shared by the MCP server and the report binary.

pub mod dashboard;
pub mod status;

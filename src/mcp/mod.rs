//! MCP server for SweatStats

pub mod server;

pub use server::SweatService;

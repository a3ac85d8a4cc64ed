//! SweatStats Library
//!
//! Workout retrieval and analytics: fetch one metric over a date range, then
//! bucket it by week or month and summarize it.

pub mod analytics;
pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;

//! Build script for SweatStats
//!
//! Bumps the local build counter and embeds the build number, timestamp and
//! cargo profile. `SOURCE_DATE_EPOCH` pins the timestamp for reproducible
//! builds.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn build_timestamp() -> DateTime<Utc> {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let path = Path::new(BUILD_NUMBER_FILE);
    let build_number = read_build_number(path) + 1;

    // A read-only checkout still builds, just without a persistent counter
    if let Err(e) = fs::write(path, build_number.to_string()) {
        println!("cargo:warning=could not update {}: {}", BUILD_NUMBER_FILE, e);
    }

    let timestamp = build_timestamp().format("%Y-%m-%dT%H:%M:%SZ");
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=SWEATSTATS_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=SWEATSTATS_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=SWEATSTATS_BUILD_PROFILE={}", profile);
}

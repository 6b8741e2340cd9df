//! Application configuration constants.
//!
//! Tunables for review sessions and the server live here; file locations
//! are in `paths`.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let from_file = std::fs::read_to_string("config.toml")
        .ok()
        .and_then(|contents| database_path_from_toml(&contents));

    // Priority 1: config.toml
    if let Some(path) = from_file {
        tracing::info!("Using database from config.toml: {}", path.display());
        return path;
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

fn database_path_from_toml(contents: &str) -> Option<PathBuf> {
    match toml::from_str::<AppConfig>(contents) {
        Ok(config) => config.database?.path.map(PathBuf::from),
        Err(e) => {
            tracing::warn!("Ignoring unreadable config.toml: {}", e);
            None
        }
    }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port when PORT is unset
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Server port (from PORT env var or the default)
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Review Configuration ====================

/// Cards sampled into one review session
pub const SESSION_SIZE: usize = 10;

/// Choices shown per question, target included
pub const QUIZ_CHOICES: usize = 4;

/// Number of distractor choices in multiple choice mode
pub const DISTRACTOR_COUNT: usize = QUIZ_CHOICES - 1;

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

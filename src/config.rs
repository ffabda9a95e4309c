//! Process configuration, loaded once at startup from the environment.
//!
//! Mirrors the upstream `main.rs` convention of `std::env::var(..).unwrap_or_else(..)`
//! for soft defaults and `.expect(..)` for hard requirements, just gathered
//! into one struct instead of scattered across `main`.

use std::time::Duration;

/// Fully resolved runtime configuration. Built once in `main` via
/// [`Config::from_env`] and handed to the router as part of `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub migration_dir: String,
    pub db_max_open_conns: u32,
    pub db_max_idle_conns: u32,
    pub db_conn_max_lifetime: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub enable_keep_alive: bool,
    pub app_url: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment, applying `.env`
    /// first via `dotenvy` (best-effort, so production deployments that
    /// set real env vars are unaffected by a missing file).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("API_KEY")
            .expect("❌ CRITICAL: API_KEY must be set for authentication to work");
        if api_key.trim().is_empty() {
            panic!("❌ CRITICAL: API_KEY must not be empty");
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env_parse("PORT", 8080u16);

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "issue-board.db".to_string());

        let migration_dir =
            std::env::var("MIGRATION_DIR").unwrap_or_else(|_| "./migrations".to_string());

        let db_max_open_conns = env_parse("DB_MAX_OPEN_CONNS", 10);
        let db_max_idle_conns = env_parse("DB_MAX_IDLE_CONNS", 5);
        let db_conn_max_lifetime = Duration::from_secs(env_parse("DB_CONN_MAX_LIFETIME", 1800));

        let read_timeout = Duration::from_secs(env_parse("SERVER_READ_TIMEOUT", 15));
        let write_timeout = Duration::from_secs(env_parse("SERVER_WRITE_TIMEOUT", 15));
        let shutdown_timeout = Duration::from_secs(env_parse("SERVER_SHUTDOWN_TIMEOUT", 30));
        let request_timeout = Duration::from_secs(env_parse("REQUEST_TIMEOUT", 60));

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|_| {
                tracing::warn!(
                    "ALLOWED_ORIGINS not set, defaulting to the local dev origin plus the production origin"
                );
                vec![
                    "http://localhost:5173".to_string(),
                    "https://issue-board.onrender.com".to_string(),
                ]
            });

        let enable_keep_alive = std::env::var("ENABLE_KEEP_ALIVE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let app_url = std::env::var("APP_URL")
            .ok()
            .or_else(|| std::env::var("RENDER_EXTERNAL_URL").ok());

        Config {
            api_key,
            host,
            port,
            database_path,
            migration_dir,
            db_max_open_conns,
            db_max_idle_conns,
            db_conn_max_lifetime,
            read_timeout,
            write_timeout,
            shutdown_timeout,
            request_timeout,
            allowed_origins,
            enable_keep_alive,
            app_url,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_missing_or_invalid() {
        std::env::remove_var("ISSUE_BOARD_TEST_NUMBER");
        assert_eq!(env_parse::<u32>("ISSUE_BOARD_TEST_NUMBER", 7), 7);

        std::env::set_var("ISSUE_BOARD_TEST_NUMBER", "not-a-number");
        assert_eq!(env_parse::<u32>("ISSUE_BOARD_TEST_NUMBER", 7), 7);

        std::env::set_var("ISSUE_BOARD_TEST_NUMBER", "42");
        assert_eq!(env_parse::<u32>("ISSUE_BOARD_TEST_NUMBER", 7), 42);
        std::env::remove_var("ISSUE_BOARD_TEST_NUMBER");
    }
}

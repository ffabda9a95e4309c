use std::str::FromStr;
use std::time::Duration;

use axum_test::TestServer;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use issue_board::{app::build_router, config::Config, repository::Repository, AppState};

pub const TEST_API_KEY: &str = "test-api-key";

/// In-memory SQLite pool, capped at one connection so every `acquire()`
/// returns the same backing database instead of each connection getting
/// its own throwaway `:memory:` instance.
async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite options")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");

    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(
        concat!(env!("CARGO_MANIFEST_DIR"), "/migrations"),
    ))
    .await
    .expect("failed to load migrations");
    migrator.run(&pool).await.expect("failed to run migrations");

    pool
}

fn test_config() -> Config {
    Config {
        api_key: TEST_API_KEY.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".to_string(),
        migration_dir: "./migrations".to_string(),
        db_max_open_conns: 1,
        db_max_idle_conns: 1,
        db_conn_max_lifetime: Duration::from_secs(1800),
        read_timeout: Duration::from_secs(15),
        write_timeout: Duration::from_secs(15),
        shutdown_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(60),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        enable_keep_alive: false,
        app_url: None,
    }
}

/// Spins up the full router (pipeline, auth, everything) against a fresh
/// in-memory database, and hands back the pool too so tests can seed
/// fixtures directly without going through the HTTP surface.
pub async fn spawn_app() -> (TestServer, SqlitePool) {
    let pool = setup_test_db().await;
    let state = AppState::new(Repository::new(pool.clone()), test_config());
    let router = build_router(state);
    let server = TestServer::new(router).expect("failed to start test server");
    (server, pool)
}

pub fn auth_header() -> (&'static str, &'static str) {
    ("x-api-key", TEST_API_KEY)
}

pub async fn create_test_user(pool: &SqlitePool, name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO users (id, name, avatar_url) VALUES (?, ?, NULL)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await
        .expect("failed to insert test user");
    id
}

pub async fn create_test_label(pool: &SqlitePool, name: &str, color: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO labels (id, name, color) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(color)
        .execute(pool)
        .await
        .expect("failed to insert test label");
    id
}

/// Inserts an issue directly (bypassing the create handler's order-index
/// computation) so tests can set up a known starting column shape.
pub async fn create_test_issue(
    pool: &SqlitePool,
    title: &str,
    status: &str,
    priority: &str,
    order_index: f64,
) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO issues (id, title, description, status, priority, assignee_id, \
         order_index, created_at, updated_at) VALUES (?, ?, '', ?, ?, NULL, ?, ?, ?)",
    )
    .bind(&id)
    .bind(title)
    .bind(status)
    .bind(priority)
    .bind(order_index)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to insert test issue");
    id
}

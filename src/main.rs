use std::net::SocketAddr;
use std::time::Duration;

use issue_board::{app::build_router, config::Config, repository::Repository, store, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!("issue-board starting");

    let pool = store::connect(&config)
        .await
        .expect("failed to connect to database");

    let state = AppState::new(Repository::new(pool), config);

    if state.config.enable_keep_alive {
        spawn_keepalive(state.clone());
    }

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port)
        .parse()
        .expect("invalid HOST:PORT combination");
    let shutdown_timeout = state.config.shutdown_timeout;

    let app = build_router(state);

    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
    .await
    .expect("server error");

    tracing::info!("server shut down cleanly");
}

/// Waits for `SIGTERM` (or `Ctrl+C` on platforms without it), logs, and
/// returns — `axum::serve`'s graceful-shutdown future then drains
/// in-flight requests. A watchdog spawned at the same moment races that
/// drain: if it isn't done within `shutdown_timeout`, the process is
/// forced to exit rather than hang waiting on a stuck connection.
async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }

    tracing::info!(?shutdown_timeout, "shutting down, draining in-flight requests");

    tokio::spawn(async move {
        tokio::time::sleep(shutdown_timeout).await;
        tracing::warn!("graceful shutdown deadline exceeded, forcing exit");
        std::process::exit(1);
    });
}

/// Optional background self-ping so free-tier hosts that sleep on
/// inactivity see periodic traffic. Failures are logged, never fatal.
fn spawn_keepalive(state: AppState) {
    let Some(app_url) = state.config.app_url.clone() else {
        tracing::warn!("ENABLE_KEEP_ALIVE set but no APP_URL/RENDER_EXTERNAL_URL configured");
        return;
    };

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        let client = reqwest::Client::new();
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            let url = format!("{}/api/health", app_url.trim_end_matches('/'));
            if let Err(err) = client.get(&url).send().await {
                tracing::warn!(error = %err, "keepalive ping failed");
            }
        }
    });
}

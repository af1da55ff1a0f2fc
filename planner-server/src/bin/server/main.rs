use std::sync::Arc;

use planner_server::config::Config;
use planner_server::config::LoggingConfig;
use planner_server::domain::user::service::AuthService;
use planner_server::inbound::http::router::create_router;
use planner_server::outbound::hashing::Argon2PasswordHasher;
use planner_server::outbound::repositories::SqliteCredentialStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_tracing(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Service terminated with error");
        return Err(e);
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.clone().into());

    tracing_subscriber::registry()
        .with(filter)
        .with(logging.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!logging.json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run(config: Config) -> Result<(), anyhow::Error> {
    tracing::info!(
        service = "planner-server",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        database_url = %config.database.url,
        address = %config.server.address(),
        hashing_memory_kib = config.hashing.memory_kib,
        hashing_iterations = config.hashing.iterations,
        json_logs = config.logging.json,
        "Configuration loaded"
    );

    let store_span = tracing::info_span!("credential_store", database = "sqlite");
    let store = Arc::new(
        SqliteCredentialStore::connect(&config.database)
            .await?
            .with_span(store_span),
    );
    store.ensure_schema().await?;
    tracing::info!(database = "sqlite", "Database initialized");

    let hasher = Arc::new(Argon2PasswordHasher::new(&config.hashing)?);
    let auth_span = tracing::info_span!("auth_service", service = "planner-server");
    let auth_service =
        Arc::new(AuthService::new(Arc::clone(&store), hasher).with_span(auth_span));
    auth_service.warm_up().await?;

    let http_address = config.server.address();
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

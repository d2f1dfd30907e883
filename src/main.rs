use anyhow::Context;
use rusty_library_catalog::{
    adapters::postgres::PostgresBookStore,
    api::{handlers::AppState, router::create_router},
    application::book::ServiceDependencies,
    config::Settings,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;

    // Initialize database connection pool
    // ストアへの接続は起動時に一度だけ行い、プロセス終了まで保持する
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to document store");

    // Initialize adapters
    let book_store = Arc::new(PostgresBookStore::new(pool));

    let service_deps = ServiceDependencies { book_store };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .context("failed to start server")?;

    Ok(())
}

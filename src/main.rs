use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use box_office::{
    config::Config, controllers, database::Database, services::ReservationService,
    store::PgSeatingStore, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting box office API");

    // Connect to the database
    let db = Database::connect(&config.database).await?;
    info!("Database connected");

    // Run migrations
    db.run_migrations().await?;

    let service = ReservationService::new(PgSeatingStore::new(db.pool.clone()));

    // Create the shared application state
    let app_state = Arc::new(AppState {
        db: db.clone(),
        service: service.clone(),
        config: config.clone(),
    });

    // --- Start background tasks ---

    // Sweeps run opportunistically on every add/delete; this loop only
    // bounds staleness while the API sits idle.
    let sweep_interval = Duration::from_secs(config.app.sweep_interval_secs);
    task::spawn(async move {
        loop {
            if let Err(e) = service.sweep_old_entries().await {
                error!("background retention sweep failed: {:?}", e);
            }
            tokio::time::sleep(sweep_interval).await;
        }
    });

    // --- Start the web server ---

    let app = Router::new()
        .route("/", get(|| async { "Box Office API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        // Mount the routes from the controllers module
        .nest("/api", controllers::routes())
        // Pass the application state to the router
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

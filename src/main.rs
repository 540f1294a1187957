use employee_api::{
    build_router, db,
    employee::repository::{InMemoryEmployeeRepository, PostgresEmployeeRepository},
    user::{InMemoryUserRepository, PostgresUserRepository},
    AppConfig, AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting employee API server");

    let config = AppConfig::from_env();
    let token_config = config.token_config();

    // Store handles are built here and injected; nothing below reaches for a global
    let app_state = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::connect(database_url, &config).await?;
            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresEmployeeRepository::new(pool)),
                token_config,
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory stores (data is lost on restart)");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryEmployeeRepository::new()),
                token_config,
            )
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server running on http://{}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::AppConfig;

/// Opens the connection pool and brings the schema up to date
pub async fn connect(
    database_url: &str,
    config: &AppConfig,
) -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    info!(max_connections = config.max_connections, "Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database schema is up to date");

    Ok(pool)
}

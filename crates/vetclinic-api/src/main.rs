use anyhow::Context;
use tracing_subscriber::EnvFilter;

use vetclinic_api::api_router;
use vetclinic_core::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("VETCLINIC_DB").unwrap_or_else(|_| "vetclinic.db".to_string());
    let db = Database::open(&db_path).with_context(|| format!("opening database {db_path}"))?;

    let bind = std::env::var("VETCLINIC_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(%bind, db = %db_path, "vetclinic api listening");

    axum::serve(listener, api_router(db)).await?;
    Ok(())
}

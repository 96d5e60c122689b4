use anyhow::Result;
use backend::axum_http::http_serve;
use backend::config::config_loader;
use crates::domain::value_objects::feature_matrix;
use crates::infra::db::postgres::postgres_connection::{self, PoolSettings};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("backend: exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("backend")?;

    feature_matrix::verify_monotonic()?;

    let dotenvy_env = config_loader::load()?;
    info!(stage = %dotenvy_env.stage, "backend: env has been loaded");

    let pool_settings = PoolSettings {
        max_size: dotenvy_env.database.max_connections,
        ..PoolSettings::default()
    };
    let postgres_pool =
        postgres_connection::establish_connection(&dotenvy_env.database.url, &pool_settings)?;
    info!(
        max_connections = pool_settings.max_size,
        "backend: postgres connection has been established"
    );

    http_serve::start(Arc::new(dotenvy_env), Arc::new(postgres_pool)).await?;

    Ok(())
}

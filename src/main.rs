use std::sync::Arc;

use anyhow::Result;
use coursecart::config::config_loader;
use coursecart::infrastructure::axum_http::http_serve;
use coursecart::infrastructure::kv::redis::RedisKv;
use coursecart::infrastructure::postgres::postgres_connection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Server exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG overrides; default to info to avoid TRACE in production.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let kv = RedisKv::connect(&dotenvy_env.redis.url).await?;
    info!("Redis connection has been established");

    http_serve::start(Arc::new(dotenvy_env), Arc::new(postgres_pool), Arc::new(kv)).await?;

    Ok(())
}

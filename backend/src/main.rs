use anyhow::Result;
use backend::axum_http::http_serve;
use backend::config::config_loader;
use crates::infra::db::postgres::postgres_connection;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // No subscriber exists yet if this fails, so report on stderr directly.
    let observability = match crates::observability::init_observability("backend") {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("Failed to initialise observability: {error:#}");
            std::process::exit(1);
        }
    };

    if let Err(error) = run().await {
        error!("Backend exited with error: {:#}", error);
        // exit skips destructors; flush the file writer first.
        drop(observability);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let dotenvy_env = config_loader::load()?;
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    http_serve::start(Arc::new(dotenvy_env), Arc::new(postgres_pool)).await?;

    Ok(())
}

use actix_web::{web, HttpServer};
use std::io;
use std::sync::Arc;

use taskvault::config::Config;
use taskvault::create_app;
use taskvault::state::AppState;
use taskvault::store::{MemoryStore, PgStore, Store};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::other(err.to_string())
}

async fn build_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await.map_err(startup_error)?;
            store.migrate().await.map_err(startup_error)?;
            log::info!("Connected to Postgres");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL is not set; using the in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        startup_error(e)
    })?;

    let store = build_store(&config).await?;
    let bind_addr = (config.server_host.clone(), config.server_port);

    log::info!("Starting taskvault server at {}", config.server_url());
    let state = web::Data::new(AppState::new(config, store));

    HttpServer::new(move || create_app(state.clone()))
        .bind(bind_addr)?
        .run()
        .await
}

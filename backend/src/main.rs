mod config;
mod error;
mod services;
mod store;

use crate::config::ServerConfig;
use crate::store::Store;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    env_logger::init_from_env(Env::default().default_filter_or(config.log_level.as_str()));

    let store = Store::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })?;

    let json_limit = config.json_limit_bytes;
    let static_dir = config.static_dir.clone();
    if let Some(dir) = &static_dir {
        info!("Serving dashboard assets from {}", dir.display());
    }

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app = App::new()
            .wrap(services::cors_headers())
            .wrap(Logger::default())
            .configure(services::configure(store.clone(), json_limit));

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

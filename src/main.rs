#[macro_use]
extern crate diesel;

use std::io;

use actix_web::{middleware, web, App, HttpServer};

mod config;
mod db;
mod error;
mod filter;
mod models;
mod payload;
mod query;
mod routes;
mod schema;

use crate::config::Config;

fn to_io(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(to_io)?;

    // set up database connection pool
    log::info!("opening catalog database {}", config.database_url);
    let pool = db::build_pool(&config.database_url, config.pool_size).map_err(to_io)?;
    db::init_schema(&pool).map_err(to_io)?;

    let static_root = config.static_root.clone();
    if static_root.is_dir() {
        log::info!("serving client assets from {}", static_root.display());
    } else {
        log::warn!(
            "static root {} not found, serving the API only",
            static_root.display()
        );
    }

    let pool = web::Data::new(pool);
    log::info!(
        "starting HTTP server at http://{}:{}",
        config.host,
        config.port
    );

    HttpServer::new(move || {
        let app = App::new()
            .app_data(pool.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure);

        if static_root.is_dir() {
            app.service(routes::static_assets(&static_root))
        } else {
            app
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

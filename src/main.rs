use std::io;
use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use order_up::config::Config;
use order_up::infrastructure::{HttpChargeService, InMemoryOrderRepository};
use order_up::{build_server, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;
    let charges = HttpChargeService::new(&config.charge_service_url, config.charge_timeout)
        .map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(charges),
        config.request_timeout,
    ));

    log::info!(
        "Starting server at http://{}:{} (charge service {})",
        config.host,
        config.port,
        config.charge_service_url
    );

    build_server(state, &config.host, config.port)?.await
}

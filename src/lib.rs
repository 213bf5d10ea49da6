pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::application::OrderService;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ChargeService, OrderRepository};
use crate::errors::AppError;

/// Shared state handed to every handler.
pub struct AppState {
    pub orders: OrderService,
    /// Deadline given to each request's [`application::RequestContext`].
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        charges: Arc<dyn ChargeService>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            orders: OrderService::new(repo, charges),
            request_timeout,
        }
    }
}

/// Register the order routes, the health check and the OpenAPI document.
///
/// Malformed JSON bodies are answered with the regular `invalid_json` error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(DomainError::InvalidInput(err.to_string())).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::from(DomainError::InvalidStatus(err.to_string())).into()
    }))
    .route("/healthz", web::get().to(handlers::orders::health_check))
    .route(
        "/api-docs/openapi.json",
        web::get().to(handlers::openapi_json),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("", web::post().to(handlers::orders::create_order))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}/charge", web::post().to(handlers::orders::charge_order))
            .route("/{id}/cancel", web::post().to(handlers::orders::cancel_order)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}

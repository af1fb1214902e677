//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

fn router(app_state: AppState) -> Router {
    let appointment_routes = Router::new()
        .route("/"
               ,post(handlers::appointments::create_appointment)
        )
        .route("/{appointment_id}"
               ,put(handlers::appointments::update_appointment)
        )
        .route("/eligible-staff"
               ,get(handlers::appointments::eligible_staff)
        )
        .route("/quote"
               ,get(handlers::appointments::quote)
        );

    let client_routes = Router::new()
        .route("/{client_id}/eligible-package"
               ,get(handlers::crm::eligible_package)
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/appointments", appointment_routes)
        .nest("/api/clients", client_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, router(app_state)).await?;
    Ok(())
}

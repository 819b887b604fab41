use std::sync::Arc;

use anyhow::Context;

use warden_api::app::{self, services};
use warden_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let config = ApiConfig::from_env();
    let services = Arc::new(services::build_services(&config));
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")
}

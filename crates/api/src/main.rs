use stockroom_api::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = GatewayConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!(backend = %config.backend_base_url, "gateway configured");

    let app = stockroom_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

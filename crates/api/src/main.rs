use anyhow::Context;

use gatehouse_api::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gatehouse_observability::init();

    let config = GatewayConfig::from_env().context("invalid configuration")?;
    let app = gatehouse_api::app::build_app(&config).context("failed to assemble gatekeeper")?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
